use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::checklist_items::ItemStatus;
use crate::entity::checklists::UnitStatus;
use crate::entity::{battery_voltages, checklist_items};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChecklistItemPayload {
    pub section: String,
    pub description: String,
    pub status: ItemStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatteryVoltagePayload {
    pub battery_number: i32,
    pub voltage: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChecklistPayload {
    pub inverter_id: Uuid,
    pub test_time_start: Option<NaiveTime>,
    pub test_time_end: Option<NaiveTime>,
    pub load: Option<String>,
    pub battery_voltage_start: Option<String>,
    pub battery_voltage_end: Option<String>,
    pub voltage_dip: Option<String>,
    pub unit_status: UnitStatus,
    pub tested_by: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<ChecklistItemPayload>,
    #[serde(default)]
    pub batteries: Vec<BatteryVoltagePayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChecklistUpdate {
    pub test_time_start: Option<NaiveTime>,
    pub test_time_end: Option<NaiveTime>,
    pub load: Option<String>,
    pub battery_voltage_start: Option<String>,
    pub battery_voltage_end: Option<String>,
    pub voltage_dip: Option<String>,
    pub tested_by: Option<String>,
    pub date: Option<NaiveDate>,
    /// When present, replaces the full item list
    pub items: Option<Vec<ChecklistItemPayload>>,
    /// When present, replaces the full battery reading list
    pub batteries: Option<Vec<BatteryVoltagePayload>>,
}

/// Checklist with nested readings and the computed status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChecklistResponse {
    pub id: Uuid,
    pub inverter_id: Uuid,
    pub unit_no: Option<String>,
    pub inverter_model: Option<String>,
    /// Reported inverter status; reverts to "Testing" once the checklist is
    /// older than 30 days
    pub status: Option<String>,
    pub test_time_start: Option<NaiveTime>,
    pub test_time_end: Option<NaiveTime>,
    pub test_time_minutes: Option<i32>,
    pub load: Option<String>,
    pub battery_voltage_start: Option<String>,
    pub battery_voltage_end: Option<String>,
    pub voltage_dip: Option<String>,
    pub unit_status: UnitStatus,
    pub tested_by: String,
    pub date: NaiveDate,
    pub items: Vec<checklist_items::Model>,
    pub batteries: Vec<battery_voltages::Model>,
}
