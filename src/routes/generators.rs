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
use crate::entity::generators;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratorPayload {
    pub generator_no: String,
    pub generator_size: i32,
    pub fuel_consumption: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratorUpdate {
    pub generator_no: Option<String>,
    pub generator_size: Option<i32>,
    pub fuel_consumption: Option<f64>,
}

/// List all generators
#[utoipa::path(
    get,
    path = "/api/generators",
    responses(
        (status = 200, description = "Generators retrieved successfully", body = Vec<generators::Model>),
    ),
    tag = "generators"
)]
pub async fn list_generators(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<generators::Model>>> {
    let generators_list = generators::Entity::find()
        .order_by_asc(generators::Column::GeneratorNo)
        .all(&state.db)
        .await?;

    Ok(Json(generators_list))
}

/// Get a specific generator
#[utoipa::path(
    get,
    path = "/api/generators/{generator_id}",
    params(("generator_id" = Uuid, Path, description = "Generator UUID")),
    responses(
        (status = 200, description = "Generator retrieved successfully", body = generators::Model),
        (status = 404, description = "Generator not found"),
    ),
    tag = "generators"
)]
pub async fn get_generator(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(generator_id): Path<Uuid>,
) -> AppResult<Json<generators::Model>> {
    let generator = generators::Entity::find_by_id(generator_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Generator '{generator_id}' not found")))?;

    Ok(Json(generator))
}

/// Create a generator
#[utoipa::path(
    post,
    path = "/api/generators",
    request_body = GeneratorPayload,
    responses(
        (status = 201, description = "Generator created", body = generators::Model),
        (status = 403, description = "Guests have read-only access"),
    ),
    tag = "generators"
)]
pub async fn create_generator(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<GeneratorPayload>,
) -> AppResult<(StatusCode, Json<generators::Model>)> {
    permissions::require_writer(user.role)?;

    let generator = generators::ActiveModel {
        id: Set(Uuid::new_v4()),
        generator_no: Set(payload.generator_no),
        generator_size: Set(payload.generator_size),
        fuel_consumption: Set(payload.fuel_consumption),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(generator)))
}

/// Update a generator
#[utoipa::path(
    patch,
    path = "/api/generators/{generator_id}",
    params(("generator_id" = Uuid, Path, description = "Generator UUID")),
    request_body = GeneratorUpdate,
    responses(
        (status = 200, description = "Generator updated", body = generators::Model),
        (status = 404, description = "Generator not found"),
    ),
    tag = "generators"
)]
pub async fn update_generator(
    State(state): State<AppState>,
    user: AuthUser,
    Path(generator_id): Path<Uuid>,
    Json(payload): Json<GeneratorUpdate>,
) -> AppResult<Json<generators::Model>> {
    permissions::require_writer(user.role)?;

    let existing = generators::Entity::find_by_id(generator_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Generator '{generator_id}' not found")))?;

    let mut generator: generators::ActiveModel = existing.into();
    if let Some(no) = payload.generator_no {
        generator.generator_no = Set(no);
    }
    if let Some(size) = payload.generator_size {
        generator.generator_size = Set(size);
    }
    if let Some(consumption) = payload.fuel_consumption {
        generator.fuel_consumption = Set(consumption);
    }

    Ok(Json(generator.update(&state.db).await?))
}

/// Delete a generator
#[utoipa::path(
    delete,
    path = "/api/generators/{generator_id}",
    params(("generator_id" = Uuid, Path, description = "Generator UUID")),
    responses(
        (status = 204, description = "Generator deleted"),
        (status = 404, description = "Generator not found"),
    ),
    tag = "generators"
)]
pub async fn delete_generator(
    State(state): State<AppState>,
    user: AuthUser,
    Path(generator_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    permissions::require_writer(user.role)?;

    let result = generators::Entity::delete_by_id(generator_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "Generator '{generator_id}' not found"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
