//! # Leases API Handlers

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{ensure_unit_visible, json_body, visible_unit};
use crate::auth::AuthUser;
use crate::error::{ApiError, not_found};
use crate::models::LeaseStatus;
use crate::models::lease::Model as LeaseModel;
use crate::permissions::Permission;
use crate::repositories::{AccessScope, LeaseRepository, NewLease, UnitRepository};
use crate::server::AppState;
use crate::utils::calculate_next_rent_due;

/// Request payload for creating a lease
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateLeaseRequest {
    pub unit_id: Uuid,
    #[schema(example = "2025-02-01")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-31")]
    pub end_date: NaiveDate,
    /// Monthly rent; defaults to the unit's listed rent
    pub rent_amount: Option<f64>,
    /// Security deposit; defaults to zero
    pub deposit: Option<f64>,
    /// Initial status; defaults to PENDING
    pub status: Option<LeaseStatus>,
}

/// Request payload for changing a lease status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateLeaseStatusRequest {
    pub status: LeaseStatus,
}

/// Lease as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaseResponse {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rent_amount: f64,
    pub deposit: f64,
    pub status: LeaseStatus,
    /// Next rent due date, absent once the lease is over or no longer running
    pub next_rent_due: Option<NaiveDate>,
}

impl LeaseResponse {
    fn from_model(model: LeaseModel, today: NaiveDate) -> Self {
        let next_rent_due = match model.status {
            LeaseStatus::Active | LeaseStatus::Pending => {
                calculate_next_rent_due(model.start_date, today).filter(|due| *due <= model.end_date)
            }
            LeaseStatus::Expired | LeaseStatus::Terminated => None,
        };

        Self {
            id: model.id,
            unit_id: model.unit_id,
            start_date: model.start_date,
            end_date: model.end_date,
            rent_amount: model.rent_amount,
            deposit: model.deposit,
            status: model.status,
            next_rent_due,
        }
    }
}

impl From<LeaseModel> for LeaseResponse {
    fn from(model: LeaseModel) -> Self {
        Self::from_model(model, Utc::now().date_naive())
    }
}

async fn visible_lease(
    db: &DatabaseConnection,
    lease_id: Uuid,
    scope: AccessScope,
) -> Result<LeaseModel, ApiError> {
    let lease = LeaseRepository::new(db)
        .get_lease(lease_id)
        .await?
        .ok_or_else(|| not_found("Lease not found"))?;

    ensure_unit_visible(db, lease.unit_id, scope, "Lease not found").await?;

    Ok(lease)
}

/// List leases on units visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/leases",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Leases, latest start first", body = Vec<LeaseResponse>),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "leases"
)]
pub async fn list_leases(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<LeaseResponse>>, ApiError> {
    user.require(Permission::LeasesRead)?;

    let unit_ids = UnitRepository::new(&state.db)
        .visible_unit_ids(user.scope())
        .await?;
    let leases = LeaseRepository::new(&state.db)
        .list_leases(unit_ids.as_deref())
        .await?;

    Ok(Json(leases.into_iter().map(Into::into).collect()))
}

/// Create a lease on a unit
#[utoipa::path(
    post,
    path = "/api/v1/leases",
    security(("bearer_auth" = [])),
    request_body = CreateLeaseRequest,
    responses(
        (status = 201, description = "Lease created", body = LeaseResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Unit not found", body = ApiError)
    ),
    tag = "leases"
)]
pub async fn create_lease(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<CreateLeaseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LeaseResponse>), ApiError> {
    user.require(Permission::LeasesCreate)?;
    let request = json_body(body)?;

    let unit = visible_unit(&state.db, request.unit_id, user.scope()).await?;
    let lease = LeaseRepository::new(&state.db)
        .create_lease(NewLease {
            unit_id: unit.id,
            start_date: request.start_date,
            end_date: request.end_date,
            rent_amount: request.rent_amount.unwrap_or(unit.rent),
            deposit: request.deposit.unwrap_or(0.0),
            status: request.status.unwrap_or(LeaseStatus::Pending),
        })
        .await?;

    tracing::info!(lease_id = %lease.id, unit_id = %unit.id, "Lease created");
    Ok((StatusCode::CREATED, Json(lease.into())))
}

/// Get one lease with its next rent due date
#[utoipa::path(
    get,
    path = "/api/v1/leases/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Lease UUID")
    ),
    responses(
        (status = 200, description = "Lease", body = LeaseResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Lease not found", body = ApiError)
    ),
    tag = "leases"
)]
pub async fn get_lease(
    State(state): State<AppState>,
    user: AuthUser,
    Path(lease_id): Path<Uuid>,
) -> Result<Json<LeaseResponse>, ApiError> {
    user.require(Permission::LeasesRead)?;

    let lease = visible_lease(&state.db, lease_id, user.scope()).await?;
    Ok(Json(lease.into()))
}

/// Change a lease status
#[utoipa::path(
    patch,
    path = "/api/v1/leases/{id}/status",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Lease UUID")
    ),
    request_body = UpdateLeaseStatusRequest,
    responses(
        (status = 200, description = "Lease updated", body = LeaseResponse),
        (status = 400, description = "Unknown status", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Lease not found", body = ApiError)
    ),
    tag = "leases"
)]
pub async fn update_lease_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(lease_id): Path<Uuid>,
    body: Result<Json<UpdateLeaseStatusRequest>, JsonRejection>,
) -> Result<Json<LeaseResponse>, ApiError> {
    user.require(Permission::LeasesUpdate)?;
    let request = json_body(body)?;

    let lease = visible_lease(&state.db, lease_id, user.scope()).await?;
    let lease = LeaseRepository::new(&state.db)
        .update_status(lease, request.status)
        .await?;

    Ok(Json(lease.into()))
}
