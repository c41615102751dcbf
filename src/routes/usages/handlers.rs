use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::{AuthUser, permissions};
use crate::common::AppState;
use crate::entity::{clients, generators, inverters, locations, orders, usages};
use crate::error::{AppError, AppResult};
use crate::metrics::{self, FuelParams};

use super::types::{UsagePayload, UsageResponse, UsageUpdate, UsagesQuery};

/// List usage rows with derived savings metrics
///
/// Supports filtering by PO number, inverter, and date range. Newest first.
#[utoipa::path(
    get,
    path = "/api/usages",
    params(UsagesQuery),
    responses(
        (status = 200, description = "Usage rows retrieved successfully", body = Vec<UsageResponse>),
    ),
    tag = "usages"
)]
pub async fn list_usages(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<UsagesQuery>,
) -> AppResult<Json<Vec<UsageResponse>>> {
    let mut db_query = usages::Entity::find();

    if let Some(ref po_number) = query.po_number {
        let matching_orders = orders::Entity::find()
            .filter(
                Condition::all().add(Expr::cust_with_values(
                    "LOWER(po_number) = LOWER($1)",
                    [po_number.clone()],
                )),
            )
            .all(&state.db)
            .await?;
        let order_ids: Vec<Uuid> = matching_orders.iter().map(|o| o.id).collect();
        db_query = db_query.filter(usages::Column::OrderId.is_in(order_ids));
    }
    if let Some(inverter_id) = query.inverter_id {
        db_query = db_query.filter(usages::Column::InverterId.eq(inverter_id));
    }
    if let Some(from_date) = query.from_date {
        db_query = db_query.filter(usages::Column::Date.gte(from_date));
    }
    if let Some(to_date) = query.to_date {
        db_query = db_query.filter(usages::Column::Date.lte(to_date));
    }

    let usages_list = db_query
        .order_by_desc(usages::Column::Date)
        .all(&state.db)
        .await?;

    // Lookup maps for display fields, one query per table
    let inverter_map: HashMap<Uuid, inverters::Model> = inverters::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();
    let order_map: HashMap<Uuid, orders::Model> = orders::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|o| (o.id, o))
        .collect();
    let location_map: HashMap<Uuid, locations::Model> = locations::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|l| (l.id, l))
        .collect();
    let generator_map: HashMap<Uuid, generators::Model> = generators::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();
    let client_map: HashMap<Uuid, clients::Model> = clients::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let response = usages_list
        .into_iter()
        .map(|usage| {
            build_response(
                &usage,
                &inverter_map,
                &order_map,
                &location_map,
                &generator_map,
                &client_map,
            )
        })
        .collect();

    Ok(Json(response))
}

/// Get a specific usage row
#[utoipa::path(
    get,
    path = "/api/usages/{usage_id}",
    params(("usage_id" = Uuid, Path, description = "Usage UUID")),
    responses(
        (status = 200, description = "Usage retrieved successfully", body = usages::Model),
        (status = 404, description = "Usage not found"),
    ),
    tag = "usages"
)]
pub async fn get_usage(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(usage_id): Path<Uuid>,
) -> AppResult<Json<usages::Model>> {
    let usage = usages::Entity::find_by_id(usage_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Usage '{usage_id}' not found")))?;

    Ok(Json(usage))
}

/// Record one day of usage
#[utoipa::path(
    post,
    path = "/api/usages",
    request_body = UsagePayload,
    responses(
        (status = 201, description = "Usage created", body = usages::Model),
        (status = 400, description = "Duplicate (inverter, order, date)"),
        (status = 404, description = "Inverter not found"),
    ),
    tag = "usages"
)]
pub async fn create_usage(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UsagePayload>,
) -> AppResult<(StatusCode, Json<usages::Model>)> {
    permissions::require_writer(user.role)?;

    inverters::Entity::find_by_id(payload.inverter_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Inverter '{}' not found", payload.inverter_id))
        })?;

    // One row per (inverter, order, date)
    let mut dup_query = usages::Entity::find()
        .filter(usages::Column::InverterId.eq(payload.inverter_id))
        .filter(usages::Column::Date.eq(payload.date));
    dup_query = match payload.order_id {
        Some(order_id) => dup_query.filter(usages::Column::OrderId.eq(order_id)),
        None => dup_query.filter(usages::Column::OrderId.is_null()),
    };
    if dup_query.one(&state.db).await?.is_some() {
        return Err(AppError::BadRequest(format!(
            "Usage for this inverter, order, and date ({}) already exists",
            payload.date
        )));
    }

    let usage = usages::ActiveModel {
        id: Set(Uuid::new_v4()),
        inverter_id: Set(payload.inverter_id),
        order_id: Set(payload.order_id),
        is_yard: Set(payload.is_yard),
        date: Set(payload.date),
        kw_consumed: Set(payload.kw_consumed),
        generator_run_hours: Set(payload.generator_run_hours),
        site_run_hours: Set(payload.site_run_hours),
        created_at: sea_orm::ActiveValue::NotSet,
        updated_at: sea_orm::ActiveValue::NotSet,
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(usage)))
}

/// Update a usage row
#[utoipa::path(
    patch,
    path = "/api/usages/{usage_id}",
    params(("usage_id" = Uuid, Path, description = "Usage UUID")),
    request_body = UsageUpdate,
    responses(
        (status = 200, description = "Usage updated", body = usages::Model),
        (status = 404, description = "Usage not found"),
    ),
    tag = "usages"
)]
pub async fn update_usage(
    State(state): State<AppState>,
    user: AuthUser,
    Path(usage_id): Path<Uuid>,
    Json(payload): Json<UsageUpdate>,
) -> AppResult<Json<usages::Model>> {
    permissions::require_writer(user.role)?;

    let existing = usages::Entity::find_by_id(usage_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Usage '{usage_id}' not found")))?;

    let mut usage: usages::ActiveModel = existing.into();
    if let Some(v) = payload.order_id {
        usage.order_id = Set(Some(v));
    }
    if let Some(v) = payload.is_yard {
        usage.is_yard = Set(v);
    }
    if let Some(v) = payload.date {
        usage.date = Set(v);
    }
    if let Some(v) = payload.kw_consumed {
        usage.kw_consumed = Set(v);
    }
    if let Some(v) = payload.generator_run_hours {
        usage.generator_run_hours = Set(v);
    }
    if let Some(v) = payload.site_run_hours {
        usage.site_run_hours = Set(v);
    }
    usage.updated_at = Set(Some(chrono::Utc::now().into()));

    Ok(Json(usage.update(&state.db).await?))
}

/// Delete a usage row
#[utoipa::path(
    delete,
    path = "/api/usages/{usage_id}",
    params(("usage_id" = Uuid, Path, description = "Usage UUID")),
    responses(
        (status = 204, description = "Usage deleted"),
        (status = 404, description = "Usage not found"),
    ),
    tag = "usages"
)]
pub async fn delete_usage(
    State(state): State<AppState>,
    user: AuthUser,
    Path(usage_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    permissions::require_writer(user.role)?;

    let result = usages::Entity::delete_by_id(usage_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Usage '{usage_id}' not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn build_response(
    usage: &usages::Model,
    inverter_map: &HashMap<Uuid, inverters::Model>,
    order_map: &HashMap<Uuid, orders::Model>,
    location_map: &HashMap<Uuid, locations::Model>,
    generator_map: &HashMap<Uuid, generators::Model>,
    client_map: &HashMap<Uuid, clients::Model>,
) -> UsageResponse {
    let inverter = inverter_map.get(&usage.inverter_id);
    let order = usage.order_id.and_then(|id| order_map.get(&id));
    let location = order
        .and_then(|o| o.location_id)
        .and_then(|id| location_map.get(&id));
    let generator = order
        .and_then(|o| o.generator_id)
        .and_then(|id| generator_map.get(&id));
    let client = order
        .and_then(|o| o.issued_to_id)
        .and_then(|id| client_map.get(&id));

    let params = FuelParams::resolve(order, generator, metrics::LIST_FUEL_CONSUMPTION_FALLBACK);
    let m = metrics::savings(usage.site_run_hours, usage.generator_run_hours, params);

    let order_display = order.map(|o| match client {
        Some(c) => format!("PO: {}/{} - {}", o.po_number, o.contract_no, c.client_name),
        None => format!("PO: {}/{}", o.po_number, o.contract_no),
    });

    UsageResponse {
        id: usage.id,
        date: usage.date,
        is_yard: usage.is_yard,
        kw_consumed: usage.kw_consumed,
        generator_run_hours: usage.generator_run_hours,
        site_run_hours: usage.site_run_hours,
        hours_saved: m.hours_saved,
        utilization_fraction: m.utilization_fraction,
        fuel_saved: m.fuel_saved,
        fuel_cost_saved: m.cost_saved,
        co2_saved: m.co2_saved,
        inverter_id: usage.inverter_id,
        inverter_unit_id: inverter.map(|i| i.unit_id.clone()),
        inverter_given_name: inverter.map(|i| i.given_name.clone()),
        inverter_model: inverter.map(|i| i.model.clone()),
        inverter_display: inverter.map(inverters::Model::display_name),
        order_id: usage.order_id,
        po_number: order.map(|o| o.po_number.clone()),
        order_display,
        location_name: location.map(|l| l.location_name.clone()),
        generator_no: generator.map(|g| g.generator_no.clone()),
    }
}
