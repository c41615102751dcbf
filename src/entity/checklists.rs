use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome recorded by the technician on the readiness test.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum UnitStatus {
    #[sea_orm(string_value = "Ready for Hire")]
    #[serde(rename = "Ready for Hire")]
    ReadyForHire,
    #[sea_orm(string_value = "Under Maintenance")]
    #[serde(rename = "Under Maintenance")]
    UnderMaintenance,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Checklist)]
#[sea_orm(table_name = "checklists")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub inverter_id: Uuid,
    #[schema(value_type = Option<chrono::NaiveTime>)]
    pub test_time_start: Option<Time>,
    #[schema(value_type = Option<chrono::NaiveTime>)]
    pub test_time_end: Option<Time>,
    /// Test duration in minutes, computed from start/end with midnight wrap.
    pub test_time_minutes: Option<i32>,
    pub load: Option<String>,
    pub battery_voltage_start: Option<String>,
    pub battery_voltage_end: Option<String>,
    pub voltage_dip: Option<String>,
    pub unit_status: UnitStatus,
    pub tested_by: String,
    pub date: Date,
    #[schema(value_type = Option<chrono::DateTime<chrono::FixedOffset>>)]
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inverters::Entity",
        from = "Column::InverterId",
        to = "super::inverters::Column::Id"
    )]
    Inverter,
    #[sea_orm(has_many = "super::checklist_items::Entity")]
    Items,
    #[sea_orm(has_many = "super::battery_voltages::Entity")]
    Batteries,
}

impl Related<super::inverters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inverter.def()
    }
}

impl Related<super::checklist_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::battery_voltages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batteries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
