use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Full order view with related display names, as the UI tables expect.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub po_number: String,
    pub contract_no: String,
    pub issued_to_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub location_id: Option<Uuid>,
    pub location_name: Option<String>,
    pub inverter_id: Option<Uuid>,
    pub inverter_name: Option<String>,
    pub inverter_model: Option<String>,
    pub generator_id: Option<Uuid>,
    pub generator_no: Option<String>,
    pub site_contact_id: Option<Uuid>,
    pub site_contact_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub purchase_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub fuel_price: Option<f64>,
    pub co2_emission_per_litre: Option<f64>,
    pub created_by: Option<String>,
}

/// Order intake payload.
///
/// Location, generator, and site contact can be referenced by id or supplied
/// inline by their natural attributes, in which case they are resolved or
/// created on the fly.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderCreatePayload {
    pub po_number: String,
    pub contract_no: String,
    pub issued_to_id: Option<Uuid>,
    pub inverter_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub purchase_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub fuel_price: Option<f64>,
    pub co2_emission_per_litre: Option<f64>,

    pub location_id: Option<Uuid>,
    /// Inline location name, resolved or created when `location_id` is absent
    pub location: Option<String>,

    pub generator_id: Option<Uuid>,
    pub generator_no: Option<String>,
    pub generator_size: Option<i32>,
    pub fuel_consumption: Option<f64>,

    pub site_contact_id: Option<Uuid>,
    pub site_contact_name: Option<String>,
    pub site_contact_email: Option<String>,
    pub site_contact_number: Option<String>,
}

/// Order update payload. The submitted field set is checked against the
/// actor's role before any of this is applied.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderUpdatePayload {
    pub po_number: Option<String>,
    pub contract_no: Option<String>,
    pub issued_to_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub inverter_id: Option<Uuid>,
    pub generator_id: Option<Uuid>,
    pub site_contact_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub fuel_price: Option<f64>,
    pub co2_emission_per_litre: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OffhireResponse {
    pub message: String,
}
