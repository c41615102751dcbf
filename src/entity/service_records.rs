use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = ServiceRecord)]
#[sea_orm(table_name = "service_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_token_number: String,
    pub inverter_id: Uuid,
    pub date_of_service: Date,
    pub problem: String,
    pub repair_done: String,
    pub status: Option<String>,
    pub distance_travelled: Option<String>,
    pub hours_spent_on_travel: Option<String>,
    pub hours_spent_on_site: Option<String>,
    pub warranty_claim: Option<String>,
    pub base: Option<String>,
    pub service_location: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inverters::Entity",
        from = "Column::InverterId",
        to = "super::inverters::Column::Id"
    )]
    Inverter,
}

impl Related<super::inverters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inverter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
