use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct UsagesQuery {
    /// Filter by PO number (case-insensitive)
    pub po_number: Option<String>,
    /// Filter by inverter UUID
    pub inverter_id: Option<Uuid>,
    /// Inclusive lower date bound
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub to_date: Option<NaiveDate>,
}

/// Usage row with derived savings metrics and display strings.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsageResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    pub is_yard: bool,
    pub kw_consumed: f64,
    pub generator_run_hours: f64,
    pub site_run_hours: f64,

    // Derived metrics
    pub hours_saved: f64,
    pub utilization_fraction: f64,
    pub fuel_saved: f64,
    pub fuel_cost_saved: f64,
    pub co2_saved: f64,

    // Related display fields
    pub inverter_id: Uuid,
    pub inverter_unit_id: Option<String>,
    pub inverter_given_name: Option<String>,
    pub inverter_model: Option<String>,
    /// Display string like "H70 10/46 HZE-10/46-070"
    pub inverter_display: Option<String>,
    pub order_id: Option<Uuid>,
    pub po_number: Option<String>,
    /// Display string like "PO: 17888/49044 - Walls"
    pub order_display: Option<String>,
    pub location_name: Option<String>,
    pub generator_no: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UsagePayload {
    pub inverter_id: Uuid,
    pub order_id: Option<Uuid>,
    #[serde(default)]
    pub is_yard: bool,
    pub date: NaiveDate,
    pub kw_consumed: f64,
    pub generator_run_hours: f64,
    #[serde(default = "default_site_run_hours")]
    pub site_run_hours: f64,
}

fn default_site_run_hours() -> f64 {
    24.0
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UsageUpdate {
    pub order_id: Option<Uuid>,
    pub is_yard: Option<bool>,
    pub date: Option<NaiveDate>,
    pub kw_consumed: Option<f64>,
    pub generator_run_hours: Option<f64>,
    pub site_run_hours: Option<f64>,
}

/// Outcome of a bulk upload: processed count plus per-row skip reasons.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    pub message: String,
    pub skipped_rows: Vec<String>,
}
