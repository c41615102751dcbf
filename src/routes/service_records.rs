use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthUser, permissions};
use crate::common::AppState;
use crate::entity::{inverters, service_records};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ServiceRecordPayload {
    pub service_token_number: String,
    pub inverter_id: Uuid,
    pub date_of_service: chrono::NaiveDate,
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

#[derive(Debug, Deserialize, ToSchema)]
pub struct ServiceRecordUpdate {
    pub service_token_number: Option<String>,
    pub date_of_service: Option<chrono::NaiveDate>,
    pub problem: Option<String>,
    pub repair_done: Option<String>,
    pub status: Option<String>,
    pub distance_travelled: Option<String>,
    pub hours_spent_on_travel: Option<String>,
    pub hours_spent_on_site: Option<String>,
    pub warranty_claim: Option<String>,
    pub base: Option<String>,
    pub service_location: Option<String>,
}

/// List all service records
#[utoipa::path(
    get,
    path = "/api/service-records",
    responses(
        (status = 200, description = "Service records retrieved successfully", body = Vec<service_records::Model>),
    ),
    tag = "service-records"
)]
pub async fn list_service_records(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<service_records::Model>>> {
    let records = service_records::Entity::find()
        .order_by_desc(service_records::Column::DateOfService)
        .all(&state.db)
        .await?;

    Ok(Json(records))
}

/// Get a specific service record
#[utoipa::path(
    get,
    path = "/api/service-records/{record_id}",
    params(("record_id" = Uuid, Path, description = "Service record UUID")),
    responses(
        (status = 200, description = "Service record retrieved successfully", body = service_records::Model),
        (status = 404, description = "Service record not found"),
    ),
    tag = "service-records"
)]
pub async fn get_service_record(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<service_records::Model>> {
    let record = service_records::Entity::find_by_id(record_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service record '{record_id}' not found")))?;

    Ok(Json(record))
}

/// Create a service record
#[utoipa::path(
    post,
    path = "/api/service-records",
    request_body = ServiceRecordPayload,
    responses(
        (status = 201, description = "Service record created", body = service_records::Model),
        (status = 404, description = "Inverter not found"),
    ),
    tag = "service-records"
)]
pub async fn create_service_record(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ServiceRecordPayload>,
) -> AppResult<(StatusCode, Json<service_records::Model>)> {
    permissions::require_writer(user.role)?;

    inverters::Entity::find_by_id(payload.inverter_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Inverter '{}' not found", payload.inverter_id))
        })?;

    let record = service_records::ActiveModel {
        id: Set(Uuid::new_v4()),
        service_token_number: Set(payload.service_token_number),
        inverter_id: Set(payload.inverter_id),
        date_of_service: Set(payload.date_of_service),
        problem: Set(payload.problem),
        repair_done: Set(payload.repair_done),
        status: Set(payload.status),
        distance_travelled: Set(payload.distance_travelled),
        hours_spent_on_travel: Set(payload.hours_spent_on_travel),
        hours_spent_on_site: Set(payload.hours_spent_on_site),
        warranty_claim: Set(payload.warranty_claim),
        base: Set(payload.base),
        service_location: Set(payload.service_location),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Update a service record
#[utoipa::path(
    patch,
    path = "/api/service-records/{record_id}",
    params(("record_id" = Uuid, Path, description = "Service record UUID")),
    request_body = ServiceRecordUpdate,
    responses(
        (status = 200, description = "Service record updated", body = service_records::Model),
        (status = 404, description = "Service record not found"),
    ),
    tag = "service-records"
)]
pub async fn update_service_record(
    State(state): State<AppState>,
    user: AuthUser,
    Path(record_id): Path<Uuid>,
    Json(payload): Json<ServiceRecordUpdate>,
) -> AppResult<Json<service_records::Model>> {
    permissions::require_writer(user.role)?;

    let existing = service_records::Entity::find_by_id(record_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service record '{record_id}' not found")))?;

    let mut record: service_records::ActiveModel = existing.into();
    if let Some(v) = payload.service_token_number {
        record.service_token_number = Set(v);
    }
    if let Some(v) = payload.date_of_service {
        record.date_of_service = Set(v);
    }
    if let Some(v) = payload.problem {
        record.problem = Set(v);
    }
    if let Some(v) = payload.repair_done {
        record.repair_done = Set(v);
    }
    if let Some(v) = payload.status {
        record.status = Set(Some(v));
    }
    if let Some(v) = payload.distance_travelled {
        record.distance_travelled = Set(Some(v));
    }
    if let Some(v) = payload.hours_spent_on_travel {
        record.hours_spent_on_travel = Set(Some(v));
    }
    if let Some(v) = payload.hours_spent_on_site {
        record.hours_spent_on_site = Set(Some(v));
    }
    if let Some(v) = payload.warranty_claim {
        record.warranty_claim = Set(Some(v));
    }
    if let Some(v) = payload.base {
        record.base = Set(Some(v));
    }
    if let Some(v) = payload.service_location {
        record.service_location = Set(Some(v));
    }

    Ok(Json(record.update(&state.db).await?))
}

/// Delete a service record
#[utoipa::path(
    delete,
    path = "/api/service-records/{record_id}",
    params(("record_id" = Uuid, Path, description = "Service record UUID")),
    responses(
        (status = 204, description = "Service record deleted"),
        (status = 404, description = "Service record not found"),
    ),
    tag = "service-records"
)]
pub async fn delete_service_record(
    State(state): State<AppState>,
    user: AuthUser,
    Path(record_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    permissions::require_writer(user.role)?;

    let result = service_records::Entity::delete_by_id(record_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "Service record '{record_id}' not found"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// List service records for one inverter
#[utoipa::path(
    get,
    path = "/api/inverters/{inverter_id}/service-records",
    params(("inverter_id" = Uuid, Path, description = "Inverter UUID")),
    responses(
        (status = 200, description = "Service records retrieved successfully", body = Vec<service_records::Model>),
    ),
    tag = "service-records"
)]
pub async fn list_inverter_service_records(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(inverter_id): Path<Uuid>,
) -> AppResult<Json<Vec<service_records::Model>>> {
    let records = service_records::Entity::find()
        .filter(service_records::Column::InverterId.eq(inverter_id))
        .order_by_desc(service_records::Column::DateOfService)
        .all(&state.db)
        .await?;

    Ok(Json(records))
}
