use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Usage)]
#[sea_orm(table_name = "usages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub inverter_id: Uuid,
    /// Nullable: yard runs and rows imported against an unknown PO have no order.
    pub order_id: Option<Uuid>,
    pub is_yard: bool,
    pub date: Date,
    pub kw_consumed: f64,
    pub generator_run_hours: f64,
    pub site_run_hours: f64,
    #[schema(value_type = Option<chrono::DateTime<chrono::FixedOffset>>)]
    pub created_at: Option<DateTimeWithTimeZone>,
    #[schema(value_type = Option<chrono::DateTime<chrono::FixedOffset>>)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inverters::Entity",
        from = "Column::InverterId",
        to = "super::inverters::Column::Id"
    )]
    Inverter,
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Order,
}

impl Related<super::inverters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inverter.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
