use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::{AuthUser, permissions};
use crate::common::AppState;
use crate::entity::checklists::UnitStatus;
use crate::entity::inverters::InverterStatus;
use crate::entity::{battery_voltages, checklist_items, checklists, inverters};
use crate::error::{AppError, AppResult};

use super::types::{
    BatteryVoltagePayload, ChecklistItemPayload, ChecklistPayload, ChecklistResponse,
    ChecklistUpdate,
};

/// Days until a passed checklist stops vouching for the unit.
const CHECKLIST_VALID_DAYS: i64 = 30;

/// Test duration in whole minutes, wrapping past midnight when the end time
/// reads earlier than the start.
#[must_use]
pub fn test_duration_minutes(start: NaiveTime, end: NaiveTime) -> i32 {
    let delta = end - start;
    let delta = if delta < Duration::zero() {
        delta + Duration::days(1)
    } else {
        delta
    };
    delta.num_minutes() as i32
}

/// Fleet status implied by a recorded test outcome.
#[must_use]
pub fn fleet_status_for(unit_status: UnitStatus) -> InverterStatus {
    match unit_status {
        UnitStatus::ReadyForHire => InverterStatus::ReadyToHire,
        UnitStatus::UnderMaintenance => InverterStatus::Breakdown,
    }
}

/// Status to report for a checklist: the inverter's stored status while the
/// checklist is fresh, "Testing" once it has expired.
#[must_use]
pub fn reported_status(
    checklist_date: NaiveDate,
    today: NaiveDate,
    inverter_status: Option<InverterStatus>,
) -> Option<String> {
    let expiry = checklist_date + Duration::days(CHECKLIST_VALID_DAYS);
    if today > expiry {
        return Some(InverterStatus::Testing.as_str().to_string());
    }
    inverter_status.map(|s| s.as_str().to_string())
}

fn validate_batteries(batteries: &[BatteryVoltagePayload]) -> AppResult<()> {
    for battery in batteries {
        if battery.battery_number < 1 || battery.battery_number > 25 {
            return Err(AppError::Validation {
                field: "battery_number",
                message: format!(
                    "Battery number must be between 1 and 25, got {}",
                    battery.battery_number
                ),
            });
        }
    }
    Ok(())
}

/// List all checklists with nested items and battery readings
#[utoipa::path(
    get,
    path = "/api/checklists",
    responses(
        (status = 200, description = "Checklists retrieved successfully", body = Vec<ChecklistResponse>),
    ),
    tag = "checklists"
)]
pub async fn list_checklists(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<ChecklistResponse>>> {
    let checklists_list = checklists::Entity::find()
        .order_by_desc(checklists::Column::Date)
        .all(&state.db)
        .await?;

    let inverter_map: HashMap<Uuid, inverters::Model> = inverters::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();

    // Group nested rows by checklist in one pass each
    let mut items_by_checklist: HashMap<Uuid, Vec<checklist_items::Model>> = HashMap::new();
    for item in checklist_items::Entity::find()
        .order_by_asc(checklist_items::Column::Section)
        .all(&state.db)
        .await?
    {
        items_by_checklist
            .entry(item.checklist_id)
            .or_default()
            .push(item);
    }

    let mut batteries_by_checklist: HashMap<Uuid, Vec<battery_voltages::Model>> = HashMap::new();
    for battery in battery_voltages::Entity::find()
        .order_by_asc(battery_voltages::Column::BatteryNumber)
        .all(&state.db)
        .await?
    {
        batteries_by_checklist
            .entry(battery.checklist_id)
            .or_default()
            .push(battery);
    }

    let today = Utc::now().date_naive();
    let response = checklists_list
        .into_iter()
        .map(|checklist| {
            let inverter = inverter_map.get(&checklist.inverter_id);
            let items = items_by_checklist
                .remove(&checklist.id)
                .unwrap_or_default();
            let batteries = batteries_by_checklist
                .remove(&checklist.id)
                .unwrap_or_default();
            build_response(checklist, inverter, items, batteries, today)
        })
        .collect();

    Ok(Json(response))
}

/// Get a specific checklist
#[utoipa::path(
    get,
    path = "/api/checklists/{checklist_id}",
    params(("checklist_id" = Uuid, Path, description = "Checklist UUID")),
    responses(
        (status = 200, description = "Checklist retrieved successfully", body = ChecklistResponse),
        (status = 404, description = "Checklist not found"),
    ),
    tag = "checklists"
)]
pub async fn get_checklist(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(checklist_id): Path<Uuid>,
) -> AppResult<Json<ChecklistResponse>> {
    let checklist = checklists::Entity::find_by_id(checklist_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Checklist '{checklist_id}' not found")))?;

    let response = load_response(&state, checklist).await?;
    Ok(Json(response))
}

/// Record a readiness test
///
/// Creates the checklist with its nested items and battery readings, and
/// recomputes the inverter's status from the recorded outcome, all in one
/// transaction: "Ready for Hire" puts the unit back in the hire pool,
/// "Under Maintenance" marks it broken down.
#[utoipa::path(
    post,
    path = "/api/checklists",
    request_body = ChecklistPayload,
    responses(
        (status = 201, description = "Checklist created", body = ChecklistResponse),
        (status = 400, description = "Invalid battery number"),
        (status = 403, description = "Guests have read-only access"),
        (status = 404, description = "Inverter not found"),
    ),
    tag = "checklists"
)]
pub async fn create_checklist(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ChecklistPayload>,
) -> AppResult<(StatusCode, Json<ChecklistResponse>)> {
    permissions::require_writer(user.role)?;
    validate_batteries(&payload.batteries)?;

    let inverter = inverters::Entity::find_by_id(payload.inverter_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Inverter '{}' not found", payload.inverter_id))
        })?;

    let test_time_minutes = match (payload.test_time_start, payload.test_time_end) {
        (Some(start), Some(end)) => Some(test_duration_minutes(start, end)),
        _ => None,
    };

    let txn = state.db.begin().await?;

    let checklist = checklists::ActiveModel {
        id: Set(Uuid::new_v4()),
        inverter_id: Set(payload.inverter_id),
        test_time_start: Set(payload.test_time_start),
        test_time_end: Set(payload.test_time_end),
        test_time_minutes: Set(test_time_minutes),
        load: Set(payload.load),
        battery_voltage_start: Set(payload.battery_voltage_start),
        battery_voltage_end: Set(payload.battery_voltage_end),
        voltage_dip: Set(payload.voltage_dip),
        unit_status: Set(payload.unit_status),
        tested_by: Set(payload.tested_by),
        date: Set(payload.date),
        created_at: sea_orm::ActiveValue::NotSet,
    }
    .insert(&txn)
    .await?;

    insert_nested(&txn, checklist.id, &payload.items, &payload.batteries).await?;

    // The test outcome drives the unit's fleet status
    let new_status = fleet_status_for(payload.unit_status);
    let mut inverter_model: inverters::ActiveModel = inverter.into();
    inverter_model.status = Set(new_status);
    inverter_model.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        checklist_id = %checklist.id,
        status = new_status.as_str(),
        "checklist recorded, inverter status updated"
    );

    let response = load_response(&state, checklist).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a checklist
///
/// Nested items and battery readings are replaced wholesale when present.
/// The inverter's status is not touched here; only a fresh test changes it.
#[utoipa::path(
    patch,
    path = "/api/checklists/{checklist_id}",
    params(("checklist_id" = Uuid, Path, description = "Checklist UUID")),
    request_body = ChecklistUpdate,
    responses(
        (status = 200, description = "Checklist updated", body = ChecklistResponse),
        (status = 404, description = "Checklist not found"),
    ),
    tag = "checklists"
)]
pub async fn update_checklist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(checklist_id): Path<Uuid>,
    Json(payload): Json<ChecklistUpdate>,
) -> AppResult<Json<ChecklistResponse>> {
    permissions::require_writer(user.role)?;
    if let Some(ref batteries) = payload.batteries {
        validate_batteries(batteries)?;
    }

    let existing = checklists::Entity::find_by_id(checklist_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Checklist '{checklist_id}' not found")))?;

    let start = payload.test_time_start.or(existing.test_time_start);
    let end = payload.test_time_end.or(existing.test_time_end);
    let test_time_minutes = match (start, end) {
        (Some(start), Some(end)) => Some(test_duration_minutes(start, end)),
        _ => None,
    };

    let txn = state.db.begin().await?;

    let mut checklist: checklists::ActiveModel = existing.into();
    if let Some(v) = payload.test_time_start {
        checklist.test_time_start = Set(Some(v));
    }
    if let Some(v) = payload.test_time_end {
        checklist.test_time_end = Set(Some(v));
    }
    checklist.test_time_minutes = Set(test_time_minutes);
    if let Some(v) = payload.load {
        checklist.load = Set(Some(v));
    }
    if let Some(v) = payload.battery_voltage_start {
        checklist.battery_voltage_start = Set(Some(v));
    }
    if let Some(v) = payload.battery_voltage_end {
        checklist.battery_voltage_end = Set(Some(v));
    }
    if let Some(v) = payload.voltage_dip {
        checklist.voltage_dip = Set(Some(v));
    }
    if let Some(v) = payload.tested_by {
        checklist.tested_by = Set(v);
    }
    if let Some(v) = payload.date {
        checklist.date = Set(v);
    }

    let checklist = checklist.update(&txn).await?;

    if let Some(ref items) = payload.items {
        checklist_items::Entity::delete_many()
            .filter(checklist_items::Column::ChecklistId.eq(checklist.id))
            .exec(&txn)
            .await?;
        insert_nested(&txn, checklist.id, items, &[]).await?;
    }
    if let Some(ref batteries) = payload.batteries {
        battery_voltages::Entity::delete_many()
            .filter(battery_voltages::Column::ChecklistId.eq(checklist.id))
            .exec(&txn)
            .await?;
        insert_nested(&txn, checklist.id, &[], batteries).await?;
    }

    txn.commit().await?;

    let response = load_response(&state, checklist).await?;
    Ok(Json(response))
}

/// Delete a checklist
#[utoipa::path(
    delete,
    path = "/api/checklists/{checklist_id}",
    params(("checklist_id" = Uuid, Path, description = "Checklist UUID")),
    responses(
        (status = 204, description = "Checklist deleted"),
        (status = 404, description = "Checklist not found"),
    ),
    tag = "checklists"
)]
pub async fn delete_checklist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(checklist_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    permissions::require_writer(user.role)?;

    let result = checklists::Entity::delete_by_id(checklist_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "Checklist '{checklist_id}' not found"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn insert_nested<C: sea_orm::ConnectionTrait>(
    db: &C,
    checklist_id: Uuid,
    items: &[ChecklistItemPayload],
    batteries: &[BatteryVoltagePayload],
) -> AppResult<()> {
    for item in items {
        checklist_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            checklist_id: Set(checklist_id),
            section: Set(item.section.clone()),
            description: Set(item.description.clone()),
            status: Set(item.status),
            remarks: Set(item.remarks.clone()),
        }
        .insert(db)
        .await?;
    }

    for battery in batteries {
        battery_voltages::ActiveModel {
            id: Set(Uuid::new_v4()),
            checklist_id: Set(checklist_id),
            battery_number: Set(battery.battery_number),
            voltage: Set(battery.voltage.clone()),
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

async fn load_response(
    state: &AppState,
    checklist: checklists::Model,
) -> AppResult<ChecklistResponse> {
    let inverter = inverters::Entity::find_by_id(checklist.inverter_id)
        .one(&state.db)
        .await?;

    let items = checklist_items::Entity::find()
        .filter(checklist_items::Column::ChecklistId.eq(checklist.id))
        .order_by_asc(checklist_items::Column::Section)
        .all(&state.db)
        .await?;

    let batteries = battery_voltages::Entity::find()
        .filter(battery_voltages::Column::ChecklistId.eq(checklist.id))
        .order_by_asc(battery_voltages::Column::BatteryNumber)
        .all(&state.db)
        .await?;

    let today = Utc::now().date_naive();
    Ok(build_response(
        checklist,
        inverter.as_ref(),
        items,
        batteries,
        today,
    ))
}

fn build_response(
    checklist: checklists::Model,
    inverter: Option<&inverters::Model>,
    items: Vec<checklist_items::Model>,
    batteries: Vec<battery_voltages::Model>,
    today: NaiveDate,
) -> ChecklistResponse {
    ChecklistResponse {
        id: checklist.id,
        inverter_id: checklist.inverter_id,
        unit_no: inverter.map(|i| i.unit_id.clone()),
        inverter_model: inverter.map(|i| i.model.clone()),
        status: reported_status(checklist.date, today, inverter.map(|i| i.status)),
        test_time_start: checklist.test_time_start,
        test_time_end: checklist.test_time_end,
        test_time_minutes: checklist.test_time_minutes,
        load: checklist.load,
        battery_voltage_start: checklist.battery_voltage_start,
        battery_voltage_end: checklist.battery_voltage_end,
        voltage_dip: checklist.voltage_dip,
        unit_status: checklist.unit_status,
        tested_by: checklist.tested_by,
        date: checklist.date,
        items,
        batteries,
    }
}
