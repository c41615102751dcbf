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
use crate::entity::clients;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClientPayload {
    pub client_name: String,
    pub client_contact: Option<String>,
    pub client_email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClientUpdate {
    pub client_name: Option<String>,
    pub client_contact: Option<String>,
    pub client_email: Option<String>,
}

/// List all clients
#[utoipa::path(
    get,
    path = "/api/clients",
    responses(
        (status = 200, description = "Clients retrieved successfully", body = Vec<clients::Model>),
        (status = 403, description = "Admin access required"),
    ),
    tag = "clients"
)]
pub async fn list_clients(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<clients::Model>>> {
    permissions::require_admin(user.role)?;

    let clients_list = clients::Entity::find()
        .order_by_asc(clients::Column::ClientName)
        .all(&state.db)
        .await?;

    Ok(Json(clients_list))
}

/// Get a specific client
#[utoipa::path(
    get,
    path = "/api/clients/{client_id}",
    params(("client_id" = Uuid, Path, description = "Client UUID")),
    responses(
        (status = 200, description = "Client retrieved successfully", body = clients::Model),
        (status = 404, description = "Client not found"),
    ),
    tag = "clients"
)]
pub async fn get_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<clients::Model>> {
    permissions::require_admin(user.role)?;

    let client = clients::Entity::find_by_id(client_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Client '{client_id}' not found")))?;

    Ok(Json(client))
}

/// Create a client
#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Client created", body = clients::Model),
        (status = 403, description = "Admin access required"),
    ),
    tag = "clients"
)]
pub async fn create_client(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ClientPayload>,
) -> AppResult<(StatusCode, Json<clients::Model>)> {
    permissions::require_admin(user.role)?;

    let client = clients::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_name: Set(payload.client_name),
        client_contact: Set(payload.client_contact),
        client_email: Set(payload.client_email),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(client)))
}

/// Update a client
#[utoipa::path(
    patch,
    path = "/api/clients/{client_id}",
    params(("client_id" = Uuid, Path, description = "Client UUID")),
    request_body = ClientUpdate,
    responses(
        (status = 200, description = "Client updated", body = clients::Model),
        (status = 404, description = "Client not found"),
    ),
    tag = "clients"
)]
pub async fn update_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<ClientUpdate>,
) -> AppResult<Json<clients::Model>> {
    permissions::require_admin(user.role)?;

    let existing = clients::Entity::find_by_id(client_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Client '{client_id}' not found")))?;

    let mut client: clients::ActiveModel = existing.into();
    if let Some(name) = payload.client_name {
        client.client_name = Set(name);
    }
    if let Some(contact) = payload.client_contact {
        client.client_contact = Set(Some(contact));
    }
    if let Some(email) = payload.client_email {
        client.client_email = Set(Some(email));
    }

    Ok(Json(client.update(&state.db).await?))
}

/// Delete a client
#[utoipa::path(
    delete,
    path = "/api/clients/{client_id}",
    params(("client_id" = Uuid, Path, description = "Client UUID")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found"),
    ),
    tag = "clients"
)]
pub async fn delete_client(
    State(state): State<AppState>,
    user: AuthUser,
    Path(client_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    permissions::require_admin(user.role)?;

    let result = clients::Entity::delete_by_id(client_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Client '{client_id}' not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}
