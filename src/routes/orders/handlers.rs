use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::{AuthUser, permissions};
use crate::common::AppState;
use crate::entity::inverters::InverterStatus;
use crate::entity::{clients, generators, inverters, locations, orders, site_contacts};
use crate::error::{AppError, AppResult};
use crate::mailer::messages;

use super::types::{OffhireResponse, OrderCreatePayload, OrderResponse, OrderUpdatePayload};

/// List all orders with related display names
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders retrieved successfully", body = Vec<OrderResponse>),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let orders_list = orders::Entity::find()
        .order_by_asc(orders::Column::PoNumber)
        .all(&state.db)
        .await?;

    // One query per related table instead of N+1 per order
    let client_map: HashMap<Uuid, clients::Model> = clients::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let location_map: HashMap<Uuid, locations::Model> = locations::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|l| (l.id, l))
        .collect();
    let inverter_map: HashMap<Uuid, inverters::Model> = inverters::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();
    let generator_map: HashMap<Uuid, generators::Model> = generators::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();
    let contact_map: HashMap<Uuid, site_contacts::Model> = site_contacts::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let response = orders_list
        .into_iter()
        .map(|order| {
            build_response(
                &order,
                order.issued_to_id.and_then(|id| client_map.get(&id)),
                order.location_id.and_then(|id| location_map.get(&id)),
                order.inverter_id.and_then(|id| inverter_map.get(&id)),
                order.generator_id.and_then(|id| generator_map.get(&id)),
                order.site_contact_id.and_then(|id| contact_map.get(&id)),
            )
        })
        .collect();

    Ok(Json(response))
}

/// Get a specific order
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order retrieved successfully", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderResponse>> {
    let order = orders::Entity::find_by_id(order_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order '{order_id}' not found")))?;

    let response = load_response(&state, &order).await?;
    Ok(Json(response))
}

/// Create an order and put its inverter on hire
///
/// The inverter flips to Hired in the same transaction as the order insert.
/// The order-created notification goes out after the commit.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = OrderCreatePayload,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 403, description = "Guests have read-only access"),
        (status = 404, description = "Referenced entity not found"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<OrderCreatePayload>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    permissions::require_writer(user.role)?;

    let txn = state.db.begin().await?;

    // Resolve or create the related records supplied inline
    let location_id = match (payload.location_id, payload.location.as_deref()) {
        (Some(id), _) => Some(id),
        (None, Some(name)) if !name.trim().is_empty() => {
            Some(get_or_create_location(&txn, name.trim()).await?)
        }
        _ => None,
    };

    let generator_id = match (
        payload.generator_id,
        payload.generator_no.as_deref(),
        payload.generator_size,
        payload.fuel_consumption,
    ) {
        (Some(id), ..) => Some(id),
        (None, Some(no), Some(size), Some(consumption)) => {
            Some(get_or_create_generator(&txn, no, size, consumption).await?)
        }
        _ => None,
    };

    let site_contact_id = match (
        payload.site_contact_id,
        payload.site_contact_name.as_deref(),
        payload.site_contact_email.as_deref(),
        payload.site_contact_number.as_deref(),
    ) {
        (Some(id), ..) => Some(id),
        (None, Some(name), Some(email), Some(number)) => {
            Some(get_or_create_site_contact(&txn, name, email, number).await?)
        }
        _ => None,
    };

    let order = orders::ActiveModel {
        id: Set(Uuid::new_v4()),
        po_number: Set(payload.po_number),
        contract_no: Set(payload.contract_no),
        issued_to_id: Set(payload.issued_to_id),
        location_id: Set(location_id),
        inverter_id: Set(payload.inverter_id),
        generator_id: Set(generator_id),
        site_contact_id: Set(site_contact_id),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        purchase_date: Set(payload.purchase_date),
        remarks: Set(payload.remarks),
        fuel_price: Set(payload.fuel_price),
        co2_emission_per_litre: Set(payload.co2_emission_per_litre),
        created_by: Set(Some(user.display_name().to_string())),
    }
    .insert(&txn)
    .await?;

    // Hire the unit as part of the same transaction
    if let Some(inverter_id) = order.inverter_id {
        let inverter = inverters::Entity::find_by_id(inverter_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inverter '{inverter_id}' not found")))?;
        let mut model: inverters::ActiveModel = inverter.into();
        model.status = Set(InverterStatus::Hired);
        model.update(&txn).await?;
    }

    txn.commit().await?;

    tracing::info!(po_number = order.po_number, "order created, unit hired");

    let response = load_response(&state, &order).await?;

    // Notify after the commit so a mail failure can never roll back the order
    let (subject, body) = messages::order_created(&summary_from(&response));
    let extra = client_email(&state, order.issued_to_id).await;
    state.mailer.spawn_send(subject, body, extra);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Update an order, enforcing field-level permissions
#[utoipa::path(
    patch,
    path = "/api/orders/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    request_body = OrderUpdatePayload,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 403, description = "Submitted fields not allowed for role"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
    Json(raw): Json<Value>,
) -> AppResult<Json<OrderResponse>> {
    permissions::require_writer(user.role)?;

    // The gate works on the submitted keys, not the deserialized struct,
    // so an employee smuggling po_number alongside allowed fields is caught
    let submitted: Vec<&str> = raw
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();
    permissions::check_order_update(user.role, &submitted)?;

    let payload: OrderUpdatePayload = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::BadRequest(format!("Invalid order payload: {e}")))?;

    let existing = orders::Entity::find_by_id(order_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order '{order_id}' not found")))?;

    let mut order: orders::ActiveModel = existing.into();
    if let Some(v) = payload.po_number {
        order.po_number = Set(v);
    }
    if let Some(v) = payload.contract_no {
        order.contract_no = Set(v);
    }
    if let Some(v) = payload.issued_to_id {
        order.issued_to_id = Set(Some(v));
    }
    if let Some(v) = payload.location_id {
        order.location_id = Set(Some(v));
    }
    if let Some(v) = payload.inverter_id {
        order.inverter_id = Set(Some(v));
    }
    if let Some(v) = payload.generator_id {
        order.generator_id = Set(Some(v));
    }
    if let Some(v) = payload.site_contact_id {
        order.site_contact_id = Set(Some(v));
    }
    if let Some(v) = payload.start_date {
        order.start_date = Set(Some(v));
    }
    if let Some(v) = payload.end_date {
        order.end_date = Set(Some(v));
    }
    if let Some(v) = payload.remarks {
        order.remarks = Set(Some(v));
    }
    if let Some(v) = payload.fuel_price {
        order.fuel_price = Set(Some(v));
    }
    if let Some(v) = payload.co2_emission_per_litre {
        order.co2_emission_per_litre = Set(Some(v));
    }

    let updated = order.update(&state.db).await?;
    let response = load_response(&state, &updated).await?;

    Ok(Json(response))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/api/orders/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    permissions::require_writer(user.role)?;

    let result = orders::Entity::delete_by_id(order_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("Order '{order_id}' not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// End an active rental
///
/// Stamps today's date as the end date and returns the unit to the testing
/// pool, both in one transaction. Notifies after commit.
#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/offhire",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order offhired", body = OffhireResponse),
        (status = 403, description = "Guests have read-only access"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn offhire_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OffhireResponse>> {
    permissions::require_writer(user.role)?;

    let order = orders::Entity::find_by_id(order_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order '{order_id}' not found")))?;

    let txn = state.db.begin().await?;

    let mut order_model: orders::ActiveModel = order.clone().into();
    order_model.end_date = Set(Some(Utc::now().date_naive()));
    let order = order_model.update(&txn).await?;

    if let Some(inverter_id) = order.inverter_id {
        if let Some(inverter) = inverters::Entity::find_by_id(inverter_id).one(&txn).await? {
            let mut model: inverters::ActiveModel = inverter.into();
            model.status = Set(InverterStatus::Testing);
            model.update(&txn).await?;
        }
    }

    txn.commit().await?;

    let response = load_response(&state, &order).await?;
    let inverter_name = response
        .inverter_name
        .clone()
        .unwrap_or_else(|| "N/A".to_string());

    tracing::info!(
        po_number = order.po_number,
        unit = inverter_name,
        "order offhired"
    );

    let offhired_by = match &user.name {
        Some(name) => format!("{name} ({})", user.sub),
        None => user.sub.clone(),
    };
    let (subject, body) = messages::order_offhired(&summary_from(&response), &offhired_by);
    let extra = client_email(&state, order.issued_to_id).await;
    state.mailer.spawn_send(subject, body, extra);

    Ok(Json(OffhireResponse {
        message: format!("Order offhired successfully for unit {inverter_name}."),
    }))
}

async fn get_or_create_location<C: ConnectionTrait>(db: &C, name: &str) -> AppResult<Uuid> {
    let existing = locations::Entity::find()
        .filter(
            Condition::all().add(Expr::cust_with_values(
                "LOWER(location_name) = LOWER($1)",
                [name],
            )),
        )
        .one(db)
        .await?;

    if let Some(location) = existing {
        return Ok(location.id);
    }

    let location = locations::ActiveModel {
        id: Set(Uuid::new_v4()),
        location_name: Set(name.to_string()),
        latitude: Set(None),
        longitude: Set(None),
    }
    .insert(db)
    .await?;

    Ok(location.id)
}

async fn get_or_create_generator<C: ConnectionTrait>(
    db: &C,
    generator_no: &str,
    generator_size: i32,
    fuel_consumption: f64,
) -> AppResult<Uuid> {
    let existing = generators::Entity::find()
        .filter(generators::Column::GeneratorNo.eq(generator_no))
        .filter(generators::Column::GeneratorSize.eq(generator_size))
        .filter(generators::Column::FuelConsumption.eq(fuel_consumption))
        .one(db)
        .await?;

    if let Some(generator) = existing {
        return Ok(generator.id);
    }

    let generator = generators::ActiveModel {
        id: Set(Uuid::new_v4()),
        generator_no: Set(generator_no.to_string()),
        generator_size: Set(generator_size),
        fuel_consumption: Set(fuel_consumption),
    }
    .insert(db)
    .await?;

    Ok(generator.id)
}

async fn get_or_create_site_contact<C: ConnectionTrait>(
    db: &C,
    name: &str,
    email: &str,
    number: &str,
) -> AppResult<Uuid> {
    let existing = site_contacts::Entity::find()
        .filter(site_contacts::Column::SiteContactName.eq(name))
        .filter(site_contacts::Column::SiteContactEmail.eq(email))
        .filter(site_contacts::Column::SiteContactNumber.eq(number))
        .one(db)
        .await?;

    if let Some(contact) = existing {
        return Ok(contact.id);
    }

    let contact = site_contacts::ActiveModel {
        id: Set(Uuid::new_v4()),
        site_contact_name: Set(name.to_string()),
        site_contact_email: Set(email.to_string()),
        site_contact_number: Set(number.to_string()),
    }
    .insert(db)
    .await?;

    Ok(contact.id)
}

/// Fetch the related records for one order and assemble the response.
async fn load_response(state: &AppState, order: &orders::Model) -> AppResult<OrderResponse> {
    let client = match order.issued_to_id {
        Some(id) => clients::Entity::find_by_id(id).one(&state.db).await?,
        None => None,
    };
    let location = match order.location_id {
        Some(id) => locations::Entity::find_by_id(id).one(&state.db).await?,
        None => None,
    };
    let inverter = match order.inverter_id {
        Some(id) => inverters::Entity::find_by_id(id).one(&state.db).await?,
        None => None,
    };
    let generator = match order.generator_id {
        Some(id) => generators::Entity::find_by_id(id).one(&state.db).await?,
        None => None,
    };
    let contact = match order.site_contact_id {
        Some(id) => site_contacts::Entity::find_by_id(id).one(&state.db).await?,
        None => None,
    };

    Ok(build_response(
        order,
        client.as_ref(),
        location.as_ref(),
        inverter.as_ref(),
        generator.as_ref(),
        contact.as_ref(),
    ))
}

fn build_response(
    order: &orders::Model,
    client: Option<&clients::Model>,
    location: Option<&locations::Model>,
    inverter: Option<&inverters::Model>,
    generator: Option<&generators::Model>,
    contact: Option<&site_contacts::Model>,
) -> OrderResponse {
    OrderResponse {
        id: order.id,
        po_number: order.po_number.clone(),
        contract_no: order.contract_no.clone(),
        issued_to_id: order.issued_to_id,
        client_name: client.map(|c| c.client_name.clone()),
        location_id: order.location_id,
        location_name: location.map(|l| l.location_name.clone()),
        inverter_id: order.inverter_id,
        inverter_name: inverter.map(inverters::Model::display_name),
        inverter_model: inverter.map(|i| i.model.clone()),
        generator_id: order.generator_id,
        generator_no: generator.map(|g| g.generator_no.clone()),
        site_contact_id: order.site_contact_id,
        site_contact_name: contact.map(|c| c.site_contact_name.clone()),
        start_date: order.start_date,
        end_date: order.end_date,
        purchase_date: order.purchase_date,
        remarks: order.remarks.clone(),
        fuel_price: order.fuel_price,
        co2_emission_per_litre: order.co2_emission_per_litre,
        created_by: order.created_by.clone(),
    }
}

fn summary_from(response: &OrderResponse) -> messages::OrderSummary {
    messages::OrderSummary {
        po_number: response.po_number.clone(),
        contract_no: response.contract_no.clone(),
        client_name: response.client_name.clone(),
        inverter_name: response.inverter_name.clone(),
        location_name: response.location_name.clone(),
        start_date: response.start_date.map(|d| d.to_string()),
        end_date: response.end_date.map(|d| d.to_string()),
        remarks: response.remarks.clone(),
    }
}

/// Client e-mail for the notification recipient list, when known.
async fn client_email(state: &AppState, client_id: Option<Uuid>) -> Vec<String> {
    let Some(id) = client_id else {
        return Vec::new();
    };
    match clients::Entity::find_by_id(id).one(&state.db).await {
        Ok(Some(client)) => client.client_email.into_iter().collect(),
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load client for notification");
            Vec::new()
        }
    }
}
