use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthUser, permissions};
use crate::common::AppState;
use crate::entity::locations;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LocationPayload {
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LocationUpdate {
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// List all locations
#[utoipa::path(
    get,
    path = "/api/locations",
    responses(
        (status = 200, description = "Locations retrieved successfully", body = Vec<locations::Model>),
    ),
    tag = "locations"
)]
pub async fn list_locations(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<locations::Model>>> {
    let locations_list = locations::Entity::find()
        .order_by_asc(locations::Column::LocationName)
        .all(&state.db)
        .await?;

    Ok(Json(locations_list))
}

/// Get a specific location
#[utoipa::path(
    get,
    path = "/api/locations/{location_id}",
    params(("location_id" = Uuid, Path, description = "Location UUID")),
    responses(
        (status = 200, description = "Location retrieved successfully", body = locations::Model),
        (status = 404, description = "Location not found"),
    ),
    tag = "locations"
)]
pub async fn get_location(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(location_id): Path<Uuid>,
) -> AppResult<Json<locations::Model>> {
    let location = locations::Entity::find_by_id(location_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Location '{location_id}' not found")))?;

    Ok(Json(location))
}

/// Create a location
#[utoipa::path(
    post,
    path = "/api/locations",
    request_body = LocationPayload,
    responses(
        (status = 201, description = "Location created", body = locations::Model),
        (status = 403, description = "Guests have read-only access"),
    ),
    tag = "locations"
)]
pub async fn create_location(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<LocationPayload>,
) -> AppResult<(StatusCode, Json<locations::Model>)> {
    permissions::require_writer(user.role)?;

    let location = locations::ActiveModel {
        id: Set(Uuid::new_v4()),
        location_name: Set(payload.location_name),
        latitude: Set(payload.latitude),
        longitude: Set(payload.longitude),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(location)))
}

/// Update a location
#[utoipa::path(
    patch,
    path = "/api/locations/{location_id}",
    params(("location_id" = Uuid, Path, description = "Location UUID")),
    request_body = LocationUpdate,
    responses(
        (status = 200, description = "Location updated", body = locations::Model),
        (status = 404, description = "Location not found"),
    ),
    tag = "locations"
)]
pub async fn update_location(
    State(state): State<AppState>,
    user: AuthUser,
    Path(location_id): Path<Uuid>,
    Json(payload): Json<LocationUpdate>,
) -> AppResult<Json<locations::Model>> {
    permissions::require_writer(user.role)?;

    let existing = locations::Entity::find_by_id(location_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Location '{location_id}' not found")))?;

    let mut location: locations::ActiveModel = existing.into();
    if let Some(name) = payload.location_name {
        location.location_name = Set(name);
    }
    if let Some(latitude) = payload.latitude {
        location.latitude = Set(Some(latitude));
    }
    if let Some(longitude) = payload.longitude {
        location.longitude = Set(Some(longitude));
    }

    Ok(Json(location.update(&state.db).await?))
}

/// Delete a location
#[utoipa::path(
    delete,
    path = "/api/locations/{location_id}",
    params(("location_id" = Uuid, Path, description = "Location UUID")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 404, description = "Location not found"),
    ),
    tag = "locations"
)]
pub async fn delete_location(
    State(state): State<AppState>,
    user: AuthUser,
    Path(location_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    permissions::require_writer(user.role)?;

    let result = locations::Entity::delete_by_id(location_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "Location '{location_id}' not found"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
