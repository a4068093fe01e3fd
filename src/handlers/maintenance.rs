//! # Maintenance Request API Handlers
//!
//! Tenants file requests against their units; landlords and admins triage them.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{ensure_unit_visible, json_body, query_params, visible_unit};
use crate::auth::AuthUser;
use crate::error::{ApiError, not_found};
use crate::models::maintenance_request::Model as MaintenanceRequestModel;
use crate::models::{MaintenancePriority, MaintenanceStatus};
use crate::permissions::Permission;
use crate::repositories::{MaintenanceRequestRepository, NewMaintenanceRequest, UnitRepository};
use crate::server::AppState;

/// Request payload for filing a maintenance request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateMaintenanceRequest {
    #[schema(example = "Leaking kitchen tap")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to MEDIUM
    pub priority: Option<MaintenancePriority>,
    pub unit_id: Uuid,
}

/// Request payload for changing a maintenance request status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateMaintenanceStatusRequest {
    pub status: MaintenanceStatus,
}

/// Query parameters for the maintenance request listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListMaintenanceQuery {
    /// Only return requests in this status
    pub status: Option<MaintenanceStatus>,
}

/// Maintenance request as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceRequestResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: MaintenanceStatus,
    pub priority: MaintenancePriority,
    pub unit_id: Uuid,
    pub creator_id: Uuid,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

impl From<MaintenanceRequestModel> for MaintenanceRequestResponse {
    fn from(model: MaintenanceRequestModel) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status,
            priority: model.priority,
            unit_id: model.unit_id,
            creator_id: model.creator_id,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// List maintenance requests on units visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/maintenance-requests",
    security(("bearer_auth" = [])),
    params(ListMaintenanceQuery),
    responses(
        (status = 200, description = "Requests, newest first", body = Vec<MaintenanceRequestResponse>),
        (status = 400, description = "Invalid query string", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "maintenance"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<ListMaintenanceQuery>, QueryRejection>,
) -> Result<Json<Vec<MaintenanceRequestResponse>>, ApiError> {
    user.require(Permission::MaintenanceRead)?;
    let query = query_params(query)?;

    let unit_ids = UnitRepository::new(&state.db)
        .visible_unit_ids(user.scope())
        .await?;
    let requests = MaintenanceRequestRepository::new(&state.db)
        .list_requests(unit_ids.as_deref(), query.status)
        .await?;

    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// File a maintenance request
#[utoipa::path(
    post,
    path = "/api/v1/maintenance-requests",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenanceRequest,
    responses(
        (status = 201, description = "Request filed", body = MaintenanceRequestResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Unit not found", body = ApiError)
    ),
    tag = "maintenance"
)]
pub async fn create_request(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<CreateMaintenanceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MaintenanceRequestResponse>), ApiError> {
    user.require(Permission::MaintenanceCreate)?;
    let request = json_body(body)?;

    let unit = visible_unit(&state.db, request.unit_id, user.scope()).await?;
    let created = MaintenanceRequestRepository::new(&state.db)
        .create_request(NewMaintenanceRequest {
            title: request.title,
            description: request.description,
            priority: request.priority.unwrap_or(MaintenancePriority::Medium),
            unit_id: unit.id,
            creator_id: user.id,
        })
        .await?;

    tracing::info!(
        request_id = %created.id,
        unit_id = %unit.id,
        priority = ?created.priority,
        "Maintenance request filed"
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Change a maintenance request status
#[utoipa::path(
    patch,
    path = "/api/v1/maintenance-requests/{id}/status",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Maintenance request UUID")
    ),
    request_body = UpdateMaintenanceStatusRequest,
    responses(
        (status = 200, description = "Request updated", body = MaintenanceRequestResponse),
        (status = 400, description = "Unknown status", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Request not found", body = ApiError)
    ),
    tag = "maintenance"
)]
pub async fn update_request_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(request_id): Path<Uuid>,
    body: Result<Json<UpdateMaintenanceStatusRequest>, JsonRejection>,
) -> Result<Json<MaintenanceRequestResponse>, ApiError> {
    user.require(Permission::MaintenanceUpdate)?;
    let body = json_body(body)?;

    let repo = MaintenanceRequestRepository::new(&state.db);
    let request = repo
        .get_request(request_id)
        .await?
        .ok_or_else(|| not_found("Maintenance request not found"))?;
    ensure_unit_visible(
        &state.db,
        request.unit_id,
        user.scope(),
        "Maintenance request not found",
    )
    .await?;

    let updated = repo.update_status(request, body.status).await?;
    Ok(Json(updated.into()))
}
