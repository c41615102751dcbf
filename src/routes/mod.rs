pub mod cache;
pub mod checklists;
pub mod clients;
pub mod generators;
pub mod health;
pub mod inverters;
pub mod locations;
pub mod orders;
mod rate_limit;
pub mod reports;
pub mod service_records;
pub mod sim_details;
pub mod site_contacts;
pub mod usages;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use sea_orm::{Condition, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr};
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use uuid::Uuid;

use rate_limit::FallbackIpKeyExtractor;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::entity::inverters as inverter_entity;
use crate::error::{AppError, AppResult};

/// Uploads carry whole site spreadsheets
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Resolve an inverter by UUID or unit id (case-insensitive)
pub async fn resolve_inverter(
    db: &DatabaseConnection,
    id_or_unit: &str,
) -> AppResult<inverter_entity::Model> {
    // Try UUID first
    if let Ok(uuid) = id_or_unit.parse::<Uuid>() {
        return inverter_entity::Entity::find_by_id(uuid)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inverter '{id_or_unit}' not found")));
    }

    // Fall back to case-insensitive unit id lookup using LOWER()
    inverter_entity::Entity::find()
        .filter(
            Condition::all().add(Expr::cust_with_values(
                "LOWER(unit_id) = LOWER($1)",
                [id_or_unit],
            )),
        )
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Inverter '{id_or_unit}' not found")))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        locations::list_locations,
        locations::get_location,
        locations::create_location,
        locations::update_location,
        locations::delete_location,
        generators::list_generators,
        generators::get_generator,
        generators::create_generator,
        generators::update_generator,
        generators::delete_generator,
        site_contacts::list_site_contacts,
        site_contacts::get_site_contact,
        site_contacts::create_site_contact,
        site_contacts::update_site_contact,
        site_contacts::delete_site_contact,
        inverters::list_inverters,
        inverters::get_inverter,
        inverters::create_inverter,
        inverters::update_inverter,
        inverters::delete_inverter,
        inverters::status_summary,
        sim_details::list_sim_details,
        sim_details::get_sim_detail,
        sim_details::create_sim_detail,
        sim_details::update_sim_detail,
        sim_details::delete_sim_detail,
        sim_details::list_inverter_sim_details,
        service_records::list_service_records,
        service_records::get_service_record,
        service_records::create_service_record,
        service_records::update_service_record,
        service_records::delete_service_record,
        service_records::list_inverter_service_records,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order,
        orders::offhire_order,
        usages::list_usages,
        usages::get_usage,
        usages::create_usage,
        usages::update_usage,
        usages::delete_usage,
        usages::upload_usages,
        checklists::list_checklists,
        checklists::get_checklist,
        checklists::create_checklist,
        checklists::update_checklist,
        checklists::delete_checklist,
        reports::inverter_usage_report,
    ),
    components(
        schemas(
            crate::entity::clients::Model,
            crate::entity::locations::Model,
            crate::entity::inverters::Model,
            crate::entity::inverters::InverterStatus,
            crate::entity::generators::Model,
            crate::entity::site_contacts::Model,
            crate::entity::orders::Model,
            crate::entity::usages::Model,
            crate::entity::sim_details::Model,
            crate::entity::service_records::Model,
            crate::entity::checklists::Model,
            crate::entity::checklists::UnitStatus,
            crate::entity::checklist_items::Model,
            crate::entity::checklist_items::ItemStatus,
            crate::entity::battery_voltages::Model,
            inverters::InverterDetailResponse,
            inverters::LocationRef,
            inverters::InverterPayload,
            inverters::InverterUpdate,
            clients::ClientPayload,
            clients::ClientUpdate,
            locations::LocationPayload,
            locations::LocationUpdate,
            generators::GeneratorPayload,
            generators::GeneratorUpdate,
            site_contacts::SiteContactPayload,
            site_contacts::SiteContactUpdate,
            sim_details::SimDetailPayload,
            sim_details::SimDetailUpdate,
            service_records::ServiceRecordPayload,
            service_records::ServiceRecordUpdate,
            orders::OrderResponse,
            orders::OffhireResponse,
            orders::OrderCreatePayload,
            orders::OrderUpdatePayload,
            usages::UsageResponse,
            usages::ImportResponse,
            usages::UsagePayload,
            usages::UsageUpdate,
            checklists::ChecklistResponse,
            checklists::ChecklistPayload,
            checklists::ChecklistUpdate,
            checklists::ChecklistItemPayload,
            checklists::BatteryVoltagePayload,
            reports::UsageReportResponse,
            reports::DailyUsage,
            reports::GeneratorInfo,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "clients", description = "Client accounts (admin only)"),
        (name = "locations", description = "Site locations"),
        (name = "inverters", description = "Inverter fleet"),
        (name = "generators", description = "Displaced generators"),
        (name = "site-contacts", description = "Site contacts"),
        (name = "orders", description = "Purchase orders and hire lifecycle"),
        (name = "usages", description = "Daily usage rows and bulk import"),
        (name = "sim-details", description = "SIM cards installed in units"),
        (name = "service-records", description = "Service history"),
        (name = "checklists", description = "Readiness test checklists"),
        (name = "reports", description = "Fuel-savings reports"),
    ),
    info(
        title = "Fleet DB API",
        description = "Fleet management API for rented solar inverter units",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            metadata_rate = %format!("{}/s burst {}", config.rate_limit_metadata_per_second, config.rate_limit_metadata_burst),
            data_rate = %format!("{}/s burst {}", config.rate_limit_data_per_second, config.rate_limit_data_burst),
            "Rate limiting configured"
        );
    }

    // Entity CRUD: cheap queries, strict limits
    let metadata_routes_base = Router::new()
        .route(
            "/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/clients/{client_id}",
            get(clients::get_client)
                .patch(clients::update_client)
                .delete(clients::delete_client),
        )
        .route(
            "/locations",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/locations/{location_id}",
            get(locations::get_location)
                .patch(locations::update_location)
                .delete(locations::delete_location),
        )
        .route(
            "/generators",
            get(generators::list_generators).post(generators::create_generator),
        )
        .route(
            "/generators/{generator_id}",
            get(generators::get_generator)
                .patch(generators::update_generator)
                .delete(generators::delete_generator),
        )
        .route(
            "/site-contacts",
            get(site_contacts::list_site_contacts).post(site_contacts::create_site_contact),
        )
        .route(
            "/site-contacts/{contact_id}",
            get(site_contacts::get_site_contact)
                .patch(site_contacts::update_site_contact)
                .delete(site_contacts::delete_site_contact),
        )
        .route(
            "/inverters",
            get(inverters::list_inverters).post(inverters::create_inverter),
        )
        .route("/inverters/status-summary", get(inverters::status_summary))
        .route(
            "/inverters/{inverter_id}",
            get(inverters::get_inverter)
                .patch(inverters::update_inverter)
                .delete(inverters::delete_inverter),
        )
        .route(
            "/inverters/{inverter_id}/sim-details",
            get(sim_details::list_inverter_sim_details),
        )
        .route(
            "/inverters/{inverter_id}/service-records",
            get(service_records::list_inverter_service_records),
        )
        .route(
            "/sim-details",
            get(sim_details::list_sim_details).post(sim_details::create_sim_detail),
        )
        .route(
            "/sim-details/{detail_id}",
            get(sim_details::get_sim_detail)
                .patch(sim_details::update_sim_detail)
                .delete(sim_details::delete_sim_detail),
        )
        .route(
            "/service-records",
            get(service_records::list_service_records).post(service_records::create_service_record),
        )
        .route(
            "/service-records/{record_id}",
            get(service_records::get_service_record)
                .patch(service_records::update_service_record)
                .delete(service_records::delete_service_record),
        )
        .route(
            "/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route(
            "/orders/{order_id}",
            get(orders::get_order)
                .patch(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/orders/{order_id}/offhire", post(orders::offhire_order))
        .route(
            "/checklists",
            get(checklists::list_checklists).post(checklists::create_checklist),
        )
        .route(
            "/checklists/{checklist_id}",
            get(checklists::get_checklist)
                .patch(checklists::update_checklist)
                .delete(checklists::delete_checklist),
        );

    // Usage data and reports: heavier queries, bulk upload
    let data_routes_base = Router::new()
        .route("/usages", get(usages::list_usages).post(usages::create_usage))
        .route("/usages/upload", post(usages::upload_usages))
        .route(
            "/usages/{usage_id}",
            get(usages::get_usage)
                .patch(usages::update_usage)
                .delete(usages::delete_usage),
        )
        .route(
            "/inverters/{inverter_id}/usage-report",
            get(reports::inverter_usage_report),
        );

    // Combine API routes, conditionally applying rate limiting
    let api_routes = if config.disable_rate_limiting {
        Router::new()
            .merge(metadata_routes_base)
            .merge(data_routes_base)
    } else {
        let metadata_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_metadata_per_second)
            .burst_size(config.rate_limit_metadata_burst)
            .finish()
            .expect("Failed to create metadata rate limiter");

        let data_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_data_per_second)
            .burst_size(config.rate_limit_data_burst)
            .finish()
            .expect("Failed to create data rate limiter");

        Router::new()
            .merge(metadata_routes_base.layer(GovernorLayer {
                config: Arc::new(metadata_limiter),
            }))
            .merge(data_routes_base.layer(GovernorLayer {
                config: Arc::new(data_limiter),
            }))
    }
    .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Combine all routes
    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
