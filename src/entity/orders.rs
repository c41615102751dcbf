use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Order)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub po_number: String,
    pub contract_no: String,
    pub issued_to_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub inverter_id: Option<Uuid>,
    pub generator_id: Option<Uuid>,
    pub site_contact_id: Option<Uuid>,
    pub start_date: Option<Date>,
    /// Null while the rental is active; stamped by the offhire action.
    pub end_date: Option<Date>,
    pub purchase_date: Option<Date>,
    pub remarks: Option<String>,
    pub fuel_price: Option<f64>,
    pub co2_emission_per_litre: Option<f64>,
    /// Name of the authenticated principal that created the order.
    pub created_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::IssuedToId",
        to = "super::clients::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::LocationId",
        to = "super::locations::Column::Id"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::inverters::Entity",
        from = "Column::InverterId",
        to = "super::inverters::Column::Id"
    )]
    Inverter,
    #[sea_orm(
        belongs_to = "super::generators::Entity",
        from = "Column::GeneratorId",
        to = "super::generators::Column::Id"
    )]
    Generator,
    #[sea_orm(
        belongs_to = "super::site_contacts::Entity",
        from = "Column::SiteContactId",
        to = "super::site_contacts::Column::Id"
    )]
    SiteContact,
    #[sea_orm(has_many = "super::usages::Entity")]
    Usages,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::inverters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inverter.def()
    }
}

impl Related<super::generators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Generator.def()
    }
}

impl Related<super::site_contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SiteContact.def()
    }
}

impl Related<super::usages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
