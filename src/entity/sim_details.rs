use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = SimDetail)]
#[sea_orm(table_name = "sim_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub inverter_id: Uuid,
    pub phone_number: Option<String>,
    pub serial_no: String,
    pub user_no: String,
    pub installation_date: Date,
    pub remarks: Option<String>,
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
