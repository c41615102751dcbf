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
use crate::entity::site_contacts;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SiteContactPayload {
    pub site_contact_name: String,
    pub site_contact_email: String,
    pub site_contact_number: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SiteContactUpdate {
    pub site_contact_name: Option<String>,
    pub site_contact_email: Option<String>,
    pub site_contact_number: Option<String>,
}

/// List all site contacts
#[utoipa::path(
    get,
    path = "/api/site-contacts",
    responses(
        (status = 200, description = "Site contacts retrieved successfully", body = Vec<site_contacts::Model>),
    ),
    tag = "site-contacts"
)]
pub async fn list_site_contacts(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<site_contacts::Model>>> {
    let contacts = site_contacts::Entity::find()
        .order_by_asc(site_contacts::Column::SiteContactName)
        .all(&state.db)
        .await?;

    Ok(Json(contacts))
}

/// Get a specific site contact
#[utoipa::path(
    get,
    path = "/api/site-contacts/{contact_id}",
    params(("contact_id" = Uuid, Path, description = "Site contact UUID")),
    responses(
        (status = 200, description = "Site contact retrieved successfully", body = site_contacts::Model),
        (status = 404, description = "Site contact not found"),
    ),
    tag = "site-contacts"
)]
pub async fn get_site_contact(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(contact_id): Path<Uuid>,
) -> AppResult<Json<site_contacts::Model>> {
    let contact = site_contacts::Entity::find_by_id(contact_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Site contact '{contact_id}' not found")))?;

    Ok(Json(contact))
}

/// Create a site contact
#[utoipa::path(
    post,
    path = "/api/site-contacts",
    request_body = SiteContactPayload,
    responses(
        (status = 201, description = "Site contact created", body = site_contacts::Model),
        (status = 403, description = "Guests have read-only access"),
    ),
    tag = "site-contacts"
)]
pub async fn create_site_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SiteContactPayload>,
) -> AppResult<(StatusCode, Json<site_contacts::Model>)> {
    permissions::require_writer(user.role)?;

    let contact = site_contacts::ActiveModel {
        id: Set(Uuid::new_v4()),
        site_contact_name: Set(payload.site_contact_name),
        site_contact_email: Set(payload.site_contact_email),
        site_contact_number: Set(payload.site_contact_number),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// Update a site contact
#[utoipa::path(
    patch,
    path = "/api/site-contacts/{contact_id}",
    params(("contact_id" = Uuid, Path, description = "Site contact UUID")),
    request_body = SiteContactUpdate,
    responses(
        (status = 200, description = "Site contact updated", body = site_contacts::Model),
        (status = 404, description = "Site contact not found"),
    ),
    tag = "site-contacts"
)]
pub async fn update_site_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(contact_id): Path<Uuid>,
    Json(payload): Json<SiteContactUpdate>,
) -> AppResult<Json<site_contacts::Model>> {
    permissions::require_writer(user.role)?;

    let existing = site_contacts::Entity::find_by_id(contact_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Site contact '{contact_id}' not found")))?;

    let mut contact: site_contacts::ActiveModel = existing.into();
    if let Some(name) = payload.site_contact_name {
        contact.site_contact_name = Set(name);
    }
    if let Some(email) = payload.site_contact_email {
        contact.site_contact_email = Set(email);
    }
    if let Some(number) = payload.site_contact_number {
        contact.site_contact_number = Set(number);
    }

    Ok(Json(contact.update(&state.db).await?))
}

/// Delete a site contact
#[utoipa::path(
    delete,
    path = "/api/site-contacts/{contact_id}",
    params(("contact_id" = Uuid, Path, description = "Site contact UUID")),
    responses(
        (status = 204, description = "Site contact deleted"),
        (status = 404, description = "Site contact not found"),
    ),
    tag = "site-contacts"
)]
pub async fn delete_site_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(contact_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    permissions::require_writer(user.role)?;

    let result = site_contacts::Entity::delete_by_id(contact_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "Site contact '{contact_id}' not found"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
