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
use crate::entity::{inverters, sim_details};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SimDetailPayload {
    pub inverter_id: Uuid,
    pub phone_number: Option<String>,
    pub serial_no: String,
    pub user_no: String,
    pub installation_date: chrono::NaiveDate,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SimDetailUpdate {
    pub phone_number: Option<String>,
    pub serial_no: Option<String>,
    pub user_no: Option<String>,
    pub installation_date: Option<chrono::NaiveDate>,
    pub remarks: Option<String>,
}

/// List all SIM details
#[utoipa::path(
    get,
    path = "/api/sim-details",
    responses(
        (status = 200, description = "SIM details retrieved successfully", body = Vec<sim_details::Model>),
    ),
    tag = "sim-details"
)]
pub async fn list_sim_details(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<sim_details::Model>>> {
    let details = sim_details::Entity::find()
        .order_by_asc(sim_details::Column::SerialNo)
        .all(&state.db)
        .await?;

    Ok(Json(details))
}

/// Get a specific SIM detail
#[utoipa::path(
    get,
    path = "/api/sim-details/{detail_id}",
    params(("detail_id" = Uuid, Path, description = "SIM detail UUID")),
    responses(
        (status = 200, description = "SIM detail retrieved successfully", body = sim_details::Model),
        (status = 404, description = "SIM detail not found"),
    ),
    tag = "sim-details"
)]
pub async fn get_sim_detail(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(detail_id): Path<Uuid>,
) -> AppResult<Json<sim_details::Model>> {
    let detail = sim_details::Entity::find_by_id(detail_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("SIM detail '{detail_id}' not found")))?;

    Ok(Json(detail))
}

/// Create a SIM detail
#[utoipa::path(
    post,
    path = "/api/sim-details",
    request_body = SimDetailPayload,
    responses(
        (status = 201, description = "SIM detail created", body = sim_details::Model),
        (status = 404, description = "Inverter not found"),
    ),
    tag = "sim-details"
)]
pub async fn create_sim_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SimDetailPayload>,
) -> AppResult<(StatusCode, Json<sim_details::Model>)> {
    permissions::require_writer(user.role)?;

    // Reject unknown inverters up front for a useful 404
    inverters::Entity::find_by_id(payload.inverter_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Inverter '{}' not found", payload.inverter_id))
        })?;

    let detail = sim_details::ActiveModel {
        id: Set(Uuid::new_v4()),
        inverter_id: Set(payload.inverter_id),
        phone_number: Set(payload.phone_number),
        serial_no: Set(payload.serial_no),
        user_no: Set(payload.user_no),
        installation_date: Set(payload.installation_date),
        remarks: Set(payload.remarks),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Update a SIM detail
#[utoipa::path(
    patch,
    path = "/api/sim-details/{detail_id}",
    params(("detail_id" = Uuid, Path, description = "SIM detail UUID")),
    request_body = SimDetailUpdate,
    responses(
        (status = 200, description = "SIM detail updated", body = sim_details::Model),
        (status = 404, description = "SIM detail not found"),
    ),
    tag = "sim-details"
)]
pub async fn update_sim_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(detail_id): Path<Uuid>,
    Json(payload): Json<SimDetailUpdate>,
) -> AppResult<Json<sim_details::Model>> {
    permissions::require_writer(user.role)?;

    let existing = sim_details::Entity::find_by_id(detail_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("SIM detail '{detail_id}' not found")))?;

    let mut detail: sim_details::ActiveModel = existing.into();
    if let Some(phone) = payload.phone_number {
        detail.phone_number = Set(Some(phone));
    }
    if let Some(serial) = payload.serial_no {
        detail.serial_no = Set(serial);
    }
    if let Some(user_no) = payload.user_no {
        detail.user_no = Set(user_no);
    }
    if let Some(date) = payload.installation_date {
        detail.installation_date = Set(date);
    }
    if let Some(remarks) = payload.remarks {
        detail.remarks = Set(Some(remarks));
    }

    Ok(Json(detail.update(&state.db).await?))
}

/// Delete a SIM detail
#[utoipa::path(
    delete,
    path = "/api/sim-details/{detail_id}",
    params(("detail_id" = Uuid, Path, description = "SIM detail UUID")),
    responses(
        (status = 204, description = "SIM detail deleted"),
        (status = 404, description = "SIM detail not found"),
    ),
    tag = "sim-details"
)]
pub async fn delete_sim_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(detail_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    permissions::require_writer(user.role)?;

    let result = sim_details::Entity::delete_by_id(detail_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "SIM detail '{detail_id}' not found"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// List SIM details for one inverter
#[utoipa::path(
    get,
    path = "/api/inverters/{inverter_id}/sim-details",
    params(("inverter_id" = Uuid, Path, description = "Inverter UUID")),
    responses(
        (status = 200, description = "SIM details retrieved successfully", body = Vec<sim_details::Model>),
    ),
    tag = "sim-details"
)]
pub async fn list_inverter_sim_details(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(inverter_id): Path<Uuid>,
) -> AppResult<Json<Vec<sim_details::Model>>> {
    let details = sim_details::Entity::find()
        .filter(sim_details::Column::InverterId.eq(inverter_id))
        .order_by_asc(sim_details::Column::InstallationDate)
        .all(&state.db)
        .await?;

    Ok(Json(details))
}
