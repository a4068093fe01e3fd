//! # Server Configuration
//!
//! This module contains the server setup and configuration for the RentEase API.

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    http::HeaderValue,
    routing::{get, patch, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::handlers;
use crate::telemetry::trace_id_middleware;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub jwt: Arc<JwtKeys>,
}

impl FromRef<AppState> for Arc<JwtKeys> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.jwt)
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::users::list_users))
        .route(
            "/properties",
            get(handlers::properties::list_properties).post(handlers::properties::create_property),
        )
        .route(
            "/properties/{id}",
            get(handlers::properties::get_property).delete(handlers::properties::delete_property),
        )
        .route(
            "/properties/{id}/units",
            get(handlers::units::list_units).post(handlers::units::create_unit),
        )
        .route("/units/{id}/tenant", put(handlers::units::assign_tenant))
        .route(
            "/leases",
            get(handlers::leases::list_leases).post(handlers::leases::create_lease),
        )
        .route("/leases/{id}", get(handlers::leases::get_lease))
        .route(
            "/leases/{id}/status",
            patch(handlers::leases::update_lease_status),
        )
        .route(
            "/maintenance-requests",
            get(handlers::maintenance::list_requests).post(handlers::maintenance::create_request),
        )
        .route(
            "/maintenance-requests/{id}/status",
            patch(handlers::maintenance::update_request_status),
        )
        .route(
            "/payments",
            get(handlers::payments::list_payments).post(handlers::payments::create_payment),
        )
        .route(
            "/payments/{id}/status",
            patch(handlers::payments::update_payment_status),
        )
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::health::healthz))
        .route("/readyz", get(handlers::health::readyz))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/me", get(handlers::auth::me))
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(trace_id_middleware));

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let jwt = JwtKeys::from_config(&config)?;

    // Resolve the configured bind address
    let addr = config
        .bind_addr()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {e}"))?;

    let state = AppState {
        config: Arc::new(config),
        db,
        jwt: Arc::new(jwt),
    };
    let profile = state.config.profile.clone();
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        crate::handlers::root,
        crate::handlers::health::healthz,
        crate::handlers::health::readyz,
        crate::handlers::auth::login,
        crate::handlers::auth::register,
        crate::handlers::auth::me,
        crate::handlers::users::list_users,
        crate::handlers::properties::list_properties,
        crate::handlers::properties::create_property,
        crate::handlers::properties::get_property,
        crate::handlers::properties::delete_property,
        crate::handlers::units::list_units,
        crate::handlers::units::create_unit,
        crate::handlers::units::assign_tenant,
        crate::handlers::leases::list_leases,
        crate::handlers::leases::create_lease,
        crate::handlers::leases::get_lease,
        crate::handlers::leases::update_lease_status,
        crate::handlers::maintenance::list_requests,
        crate::handlers::maintenance::create_request,
        crate::handlers::maintenance::update_request_status,
        crate::handlers::payments::list_payments,
        crate::handlers::payments::create_payment,
        crate::handlers::payments::update_payment_status,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::PublicUser,
            crate::models::Role,
            crate::models::LeaseStatus,
            crate::models::MaintenanceStatus,
            crate::models::MaintenancePriority,
            crate::models::PaymentStatus,
            crate::models::PaymentType,
            crate::error::ApiError,
            crate::auth::AuthResponse,
            crate::auth::RegisterInput,
            crate::handlers::auth::LoginRequest,
            crate::handlers::health::HealthStatus,
            crate::handlers::properties::CreatePropertyRequest,
            crate::handlers::properties::PropertyResponse,
            crate::handlers::units::CreateUnitRequest,
            crate::handlers::units::AssignTenantRequest,
            crate::handlers::units::UnitResponse,
            crate::handlers::leases::CreateLeaseRequest,
            crate::handlers::leases::UpdateLeaseStatusRequest,
            crate::handlers::leases::LeaseResponse,
            crate::handlers::maintenance::CreateMaintenanceRequest,
            crate::handlers::maintenance::UpdateMaintenanceStatusRequest,
            crate::handlers::maintenance::MaintenanceRequestResponse,
            crate::handlers::payments::CreatePaymentRequest,
            crate::handlers::payments::UpdatePaymentStatusRequest,
            crate::handlers::payments::PaymentResponse,
        )
    ),
    tags(
        (name = "root", description = "Service information"),
        (name = "health", description = "Liveness and readiness checks"),
        (name = "auth", description = "Login, registration and current user"),
        (name = "users", description = "Account administration"),
        (name = "properties", description = "Landlord properties"),
        (name = "units", description = "Rentable units and tenant assignment"),
        (name = "leases", description = "Leases and rent schedule"),
        (name = "maintenance", description = "Maintenance requests"),
        (name = "payments", description = "Rent and fee payments"),
    ),
    info(
        title = "RentEase API",
        description = "Property management API for landlords, tenants and administrators",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
