use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::{AuthUser, permissions};
use crate::common::{AppState, geo};
use crate::entity::inverters::InverterStatus;
use crate::entity::{inverters, locations, orders};
use crate::error::{AppError, AppResult};
use crate::mailer::messages;
use crate::routes::resolve_inverter;

#[derive(Debug, Deserialize, IntoParams)]
pub struct InvertersQuery {
    /// Filter by status names (comma-separated, case-insensitive)
    pub status: Option<String>,
    /// Substring search over unit id, model, serial no, and given name
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InverterPayload {
    pub unit_id: String,
    pub model: String,
    pub given_name: String,
    pub given_start_name: String,
    pub serial_no: String,
    pub status: InverterStatus,
    pub remarks: Option<String>,
    pub vrm_installation_id: Option<String>,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InverterUpdate {
    pub unit_id: Option<String>,
    pub model: Option<String>,
    pub given_name: Option<String>,
    pub given_start_name: Option<String>,
    pub serial_no: Option<String>,
    pub remarks: Option<String>,
    pub vrm_installation_id: Option<String>,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct LocationRef {
    pub id: Uuid,
    pub location_name: String,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct InverterDetailResponse {
    pub id: Uuid,
    pub unit_id: String,
    pub model: String,
    pub given_name: String,
    pub given_start_name: String,
    pub serial_no: String,
    pub status: InverterStatus,
    pub remarks: Option<String>,
    pub vrm_installation_id: Option<String>,
    pub location: Option<LocationRef>,
}

/// List inverters, optionally filtered by status and search term
#[utoipa::path(
    get,
    path = "/api/inverters",
    params(InvertersQuery),
    responses(
        (status = 200, description = "Inverters retrieved successfully", body = Vec<inverters::Model>),
        (status = 400, description = "Unknown status name"),
    ),
    tag = "inverters"
)]
pub async fn list_inverters(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<InvertersQuery>,
) -> AppResult<Json<Vec<inverters::Model>>> {
    let mut db_query = inverters::Entity::find();

    if let Some(ref status_param) = query.status {
        let mut statuses = Vec::new();
        for name in status_param.split(',').filter(|s| !s.trim().is_empty()) {
            let status = InverterStatus::from_name(name).ok_or_else(|| {
                AppError::BadRequest(format!("Unknown inverter status: {}", name.trim()))
            })?;
            statuses.push(status);
        }
        if !statuses.is_empty() {
            db_query = db_query.filter(inverters::Column::Status.is_in(statuses));
        }
    }

    if let Some(ref search) = query.search {
        let pattern = format!("%{}%", search.trim());
        db_query = db_query.filter(
            Condition::any()
                .add(Expr::cust_with_values(
                    "LOWER(unit_id) LIKE LOWER($1)",
                    [pattern.clone()],
                ))
                .add(Expr::cust_with_values(
                    "LOWER(model) LIKE LOWER($1)",
                    [pattern.clone()],
                ))
                .add(Expr::cust_with_values(
                    "LOWER(serial_no) LIKE LOWER($1)",
                    [pattern.clone()],
                ))
                .add(Expr::cust_with_values(
                    "LOWER(given_name) LIKE LOWER($1)",
                    [pattern],
                )),
        );
    }

    let inverters_list = db_query
        .order_by_asc(inverters::Column::UnitId)
        .all(&state.db)
        .await?;

    Ok(Json(inverters_list))
}

/// Get a specific inverter by UUID or unit id
#[utoipa::path(
    get,
    path = "/api/inverters/{inverter_id}",
    params(("inverter_id" = String, Path, description = "Inverter UUID or unit id")),
    responses(
        (status = 200, description = "Inverter retrieved successfully", body = InverterDetailResponse),
        (status = 404, description = "Inverter not found"),
    ),
    tag = "inverters"
)]
pub async fn get_inverter(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(inverter_id): Path<String>,
) -> AppResult<Json<InverterDetailResponse>> {
    let inverter = resolve_inverter(&state.db, &inverter_id).await?;

    let location = if let Some(location_id) = inverter.location_id {
        locations::Entity::find_by_id(location_id)
            .one(&state.db)
            .await?
            .map(|l| LocationRef {
                id: l.id,
                location_name: l.location_name,
            })
    } else {
        None
    };

    Ok(Json(InverterDetailResponse {
        id: inverter.id,
        unit_id: inverter.unit_id,
        model: inverter.model,
        given_name: inverter.given_name,
        given_start_name: inverter.given_start_name,
        serial_no: inverter.serial_no,
        status: inverter.status,
        remarks: inverter.remarks,
        vrm_installation_id: inverter.vrm_installation_id,
        location,
    }))
}

/// Create an inverter
///
/// Units created without a location are parked at the depot's default
/// location when one exists.
#[utoipa::path(
    post,
    path = "/api/inverters",
    request_body = InverterPayload,
    responses(
        (status = 201, description = "Inverter created", body = inverters::Model),
        (status = 403, description = "Guests have read-only access"),
    ),
    tag = "inverters"
)]
pub async fn create_inverter(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<InverterPayload>,
) -> AppResult<(StatusCode, Json<inverters::Model>)> {
    permissions::require_writer(user.role)?;

    let location_id = match payload.location_id {
        Some(id) => Some(id),
        None => default_location_id(&state).await?,
    };

    let inverter = inverters::ActiveModel {
        id: Set(Uuid::new_v4()),
        unit_id: Set(payload.unit_id),
        model: Set(payload.model),
        given_name: Set(payload.given_name),
        given_start_name: Set(payload.given_start_name),
        serial_no: Set(payload.serial_no),
        status: Set(payload.status),
        remarks: Set(payload.remarks),
        vrm_installation_id: Set(payload.vrm_installation_id),
        location_id: Set(location_id),
    }
    .insert(&state.db)
    .await?;

    check_depot_distance(&state, &inverter).await;

    Ok((StatusCode::CREATED, Json(inverter)))
}

/// Update an inverter
///
/// Status is not writable here; it only moves through hire, offhire, and
/// checklist events.
#[utoipa::path(
    patch,
    path = "/api/inverters/{inverter_id}",
    params(("inverter_id" = Uuid, Path, description = "Inverter UUID")),
    request_body = InverterUpdate,
    responses(
        (status = 200, description = "Inverter updated", body = inverters::Model),
        (status = 404, description = "Inverter not found"),
    ),
    tag = "inverters"
)]
pub async fn update_inverter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(inverter_id): Path<Uuid>,
    Json(payload): Json<InverterUpdate>,
) -> AppResult<Json<inverters::Model>> {
    permissions::require_writer(user.role)?;

    let existing = inverters::Entity::find_by_id(inverter_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Inverter '{inverter_id}' not found")))?;

    let had_location = existing.location_id.is_some();

    let mut inverter: inverters::ActiveModel = existing.into();
    if let Some(v) = payload.unit_id {
        inverter.unit_id = Set(v);
    }
    if let Some(v) = payload.model {
        inverter.model = Set(v);
    }
    if let Some(v) = payload.given_name {
        inverter.given_name = Set(v);
    }
    if let Some(v) = payload.given_start_name {
        inverter.given_start_name = Set(v);
    }
    if let Some(v) = payload.serial_no {
        inverter.serial_no = Set(v);
    }
    if let Some(v) = payload.remarks {
        inverter.remarks = Set(Some(v));
    }
    if let Some(v) = payload.vrm_installation_id {
        inverter.vrm_installation_id = Set(Some(v));
    }
    if let Some(v) = payload.location_id {
        inverter.location_id = Set(Some(v));
    } else if !had_location {
        // Units that never went on hire stay parked at the depot
        let has_order = orders::Entity::find()
            .filter(orders::Column::InverterId.eq(inverter_id))
            .one(&state.db)
            .await?
            .is_some();
        if !has_order {
            inverter.location_id = Set(default_location_id(&state).await?);
        }
    }

    let updated = inverter.update(&state.db).await?;

    check_depot_distance(&state, &updated).await;

    Ok(Json(updated))
}

/// Delete an inverter
#[utoipa::path(
    delete,
    path = "/api/inverters/{inverter_id}",
    params(("inverter_id" = Uuid, Path, description = "Inverter UUID")),
    responses(
        (status = 204, description = "Inverter deleted"),
        (status = 404, description = "Inverter not found"),
    ),
    tag = "inverters"
)]
pub async fn delete_inverter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(inverter_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    permissions::require_writer(user.role)?;

    let result = inverters::Entity::delete_by_id(inverter_id)
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "Inverter '{inverter_id}' not found"
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Count inverters per status
#[utoipa::path(
    get,
    path = "/api/inverters/status-summary",
    responses(
        (status = 200, description = "Counts per status name", body = BTreeMap<String, i64>),
    ),
    tag = "inverters"
)]
pub async fn status_summary(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<BTreeMap<String, i64>>> {
    let inverters_list = inverters::Entity::find().all(&state.db).await?;

    let mut summary: BTreeMap<String, i64> = BTreeMap::new();
    for inverter in inverters_list {
        *summary
            .entry(inverter.status.as_str().to_string())
            .or_insert(0) += 1;
    }

    Ok(Json(summary))
}

/// Look up the depot's default location, if configured in the database.
async fn default_location_id(state: &AppState) -> AppResult<Option<Uuid>> {
    let location = locations::Entity::find()
        .filter(
            Condition::all().add(Expr::cust_with_values(
                "LOWER(location_name) = LOWER($1)",
                [state.config.depot_location_name.clone()],
            )),
        )
        .one(&state.db)
        .await?;

    Ok(location.map(|l| l.id))
}

/// Alert when a unit's location sits too far from the depot.
///
/// Best-effort: lookup failures are logged, the request is never failed.
async fn check_depot_distance(state: &AppState, inverter: &inverters::Model) {
    let Some(location_id) = inverter.location_id else {
        return;
    };

    let location = match locations::Entity::find_by_id(location_id).one(&state.db).await {
        Ok(Some(l)) => l,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load location for distance check");
            return;
        }
    };

    if location
        .location_name
        .eq_ignore_ascii_case(&state.config.depot_location_name)
    {
        return;
    }

    let (Some(latitude), Some(longitude)) = (location.latitude, location.longitude) else {
        return;
    };

    let distance = geo::haversine_meters(
        state.config.depot_latitude,
        state.config.depot_longitude,
        latitude,
        longitude,
    );

    if distance > state.config.distance_alert_meters {
        tracing::warn!(
            unit_id = inverter.unit_id,
            distance_m = distance,
            "inverter placed far from depot"
        );
        let (subject, body) = messages::distance_alert(&inverter.unit_id, distance);
        state.mailer.spawn_send(subject, body, Vec::new());
    }
}
