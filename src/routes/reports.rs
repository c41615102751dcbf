use axum::{
    extract::{Path, State},
    response::Response,
};
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    sea_query::{NullOrdering, Order},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::common::AppState;
use crate::entity::{clients, generators, inverters, locations, orders, usages};
use crate::error::{AppError, AppResult};
use crate::metrics::{self, FuelParams, round2};
use crate::routes::{cache, resolve_inverter};

#[derive(Debug, Serialize, ToSchema)]
pub struct GeneratorInfo {
    pub generator_no: String,
    pub fuel_consumption: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub kw_consumed: f64,
    pub generator_run_hours: f64,
    pub hours_saved: f64,
    /// Share of site runtime on inverter power, as a percentage
    pub battery_percentage: f64,
    pub fuel_saved: f64,
    pub fuel_cost_saved: f64,
    pub co2_saved: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsageReportResponse {
    pub po_number: String,
    pub client_name: Option<String>,
    pub location_name: Option<String>,
    pub generator: GeneratorInfo,
    pub inverter_unit_id: String,
    pub inverter_given_name: String,
    pub fuel_price: f64,
    pub co2_per_litre: f64,
    pub total_kw: f64,
    pub total_hours_saved: f64,
    pub total_fuel_saved: f64,
    pub fuel_cost_saved: f64,
    pub co2_saved: f64,
    /// Simple mean of the daily battery percentages
    pub avg_usage_percent: f64,
    pub daily_usage: Vec<DailyUsage>,
}

/// Fold the usage history into the daily breakdown plus totals.
#[must_use]
pub fn build_report(
    inverter: &inverters::Model,
    order: &orders::Model,
    client_name: Option<String>,
    location_name: Option<String>,
    generator: Option<&generators::Model>,
    usage_rows: &[usages::Model],
) -> UsageReportResponse {
    let params = FuelParams::resolve(
        Some(order),
        generator,
        metrics::REPORT_FUEL_CONSUMPTION_FALLBACK,
    );

    let mut daily_usage = Vec::with_capacity(usage_rows.len());
    let mut total_kw = 0.0;
    let mut total_hours_saved = 0.0;
    let mut total_fuel_saved = 0.0;
    let mut total_cost_saved = 0.0;
    let mut total_co2_saved = 0.0;
    let mut battery_percentage_sum = 0.0;

    for usage in usage_rows {
        let m = metrics::savings(usage.site_run_hours, usage.generator_run_hours, params);
        let battery_percentage = m.battery_percentage;

        daily_usage.push(DailyUsage {
            date: usage.date,
            kw_consumed: usage.kw_consumed,
            generator_run_hours: usage.generator_run_hours,
            hours_saved: m.hours_saved,
            battery_percentage,
            fuel_saved: m.fuel_saved,
            fuel_cost_saved: m.cost_saved,
            co2_saved: m.co2_saved,
        });

        total_kw += usage.kw_consumed;
        total_hours_saved += m.hours_saved;
        total_fuel_saved += m.fuel_saved;
        total_cost_saved += m.cost_saved;
        total_co2_saved += m.co2_saved;
        battery_percentage_sum += battery_percentage;
    }

    let avg_usage_percent = if daily_usage.is_empty() {
        0.0
    } else {
        round2(battery_percentage_sum / daily_usage.len() as f64)
    };

    UsageReportResponse {
        po_number: order.po_number.clone(),
        client_name,
        location_name,
        generator: GeneratorInfo {
            generator_no: generator.map(|g| g.generator_no.clone()).unwrap_or_default(),
            fuel_consumption: params.fuel_consumption,
        },
        inverter_unit_id: inverter.unit_id.clone(),
        inverter_given_name: inverter.given_name.clone(),
        fuel_price: params.fuel_price,
        co2_per_litre: params.co2_per_litre,
        total_kw,
        total_hours_saved: round2(total_hours_saved),
        total_fuel_saved: round2(total_fuel_saved),
        fuel_cost_saved: round2(total_cost_saved),
        co2_saved: round2(total_co2_saved),
        avg_usage_percent,
        daily_usage,
    }
}

/// Usage and fuel-savings report for one inverter
///
/// Covers the usage history under the inverter's latest order (most recent
/// start date). An inverter that never went on hire has no order and reports
/// not-found.
#[utoipa::path(
    get,
    path = "/api/inverters/{inverter_id}/usage-report",
    params(
        ("inverter_id" = String, Path, description = "Inverter UUID or unit id"),
    ),
    responses(
        (status = 200, description = "Report computed successfully", body = UsageReportResponse),
        (status = 404, description = "Inverter not found, or it has no order"),
    ),
    tag = "reports"
)]
pub async fn inverter_usage_report(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(inverter_id): Path<String>,
) -> AppResult<Response> {
    let inverter = resolve_inverter(&state.db, &inverter_id).await?;

    let cache_key = cache::cache_key("usage-report", &[&inverter.id.to_string()]);
    if let Some(cached) = cache::get_cached(&state, &cache_key, inverter.id).await {
        return cache::json_response((*cached).to_vec(), true);
    }

    // Latest order wins; the sort key is the contract start date
    let order = orders::Entity::find()
        .filter(orders::Column::InverterId.eq(inverter.id))
        .order_by_with_nulls(orders::Column::StartDate, Order::Desc, NullOrdering::Last)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No order found for this inverter".to_string()))?;

    let usage_rows = usages::Entity::find()
        .filter(usages::Column::InverterId.eq(inverter.id))
        .filter(usages::Column::OrderId.eq(order.id))
        .order_by_asc(usages::Column::Date)
        .all(&state.db)
        .await?;

    let client_name = match order.issued_to_id {
        Some(id) => clients::Entity::find_by_id(id)
            .one(&state.db)
            .await?
            .map(|c| c.client_name),
        None => None,
    };
    let location_name = match order.location_id {
        Some(id) => locations::Entity::find_by_id(id)
            .one(&state.db)
            .await?
            .map(|l| l.location_name),
        None => None,
    };
    let generator = match order.generator_id {
        Some(id) => generators::Entity::find_by_id(id).one(&state.db).await?,
        None => None,
    };

    let report = build_report(
        &inverter,
        &order,
        client_name,
        location_name,
        generator.as_ref(),
        &usage_rows,
    );

    // Freshness marker: the report is stale once a newer usage write lands
    let max_time = cache::get_latest_usage_time(&state, inverter.id).await?;
    cache::cache_and_respond(&state, cache_key, &report, max_time).await
}
