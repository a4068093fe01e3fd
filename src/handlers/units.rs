//! # Units API Handlers

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{json_body, visible_unit};
use crate::auth::AuthUser;
use crate::error::{ApiError, not_found};
use crate::models::unit::Model as UnitModel;
use crate::permissions::Permission;
use crate::repositories::{NewUnit, PropertyRepository, UnitRepository};
use crate::server::AppState;

/// Request payload for creating a unit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUnitRequest {
    #[schema(example = "2B")]
    pub number: String,
    /// Monthly rent
    #[schema(example = 1450.0)]
    pub rent: f64,
}

/// Request payload for assigning or vacating a unit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignTenantRequest {
    /// TENANT account to assign; `null` vacates the unit
    pub tenant_id: Option<Uuid>,
}

/// Unit as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnitResponse {
    pub id: Uuid,
    pub number: String,
    pub property_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub rent: f64,
}

impl From<UnitModel> for UnitResponse {
    fn from(model: UnitModel) -> Self {
        Self {
            id: model.id,
            number: model.number,
            property_id: model.property_id,
            tenant_id: model.tenant_id,
            rent: model.rent,
        }
    }
}

/// List a property's units visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}/units",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Property UUID")
    ),
    responses(
        (status = 200, description = "Units ordered by number", body = Vec<UnitResponse>),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Property not found", body = ApiError)
    ),
    tag = "units"
)]
pub async fn list_units(
    State(state): State<AppState>,
    user: AuthUser,
    Path(property_id): Path<Uuid>,
) -> Result<Json<Vec<UnitResponse>>, ApiError> {
    user.require(Permission::UnitsRead)?;
    let scope = user.scope();

    PropertyRepository::new(&state.db)
        .get_property(property_id, scope)
        .await?
        .ok_or_else(|| not_found("Property not found"))?;

    let units = UnitRepository::new(&state.db)
        .list_units_for_property(property_id, scope)
        .await?;

    Ok(Json(units.into_iter().map(Into::into).collect()))
}

/// Add a unit to a property
#[utoipa::path(
    post,
    path = "/api/v1/properties/{id}/units",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Property UUID")
    ),
    request_body = CreateUnitRequest,
    responses(
        (status = 201, description = "Unit created", body = UnitResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Property not found", body = ApiError),
        (status = 409, description = "Unit number already used in this property", body = ApiError)
    ),
    tag = "units"
)]
pub async fn create_unit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(property_id): Path<Uuid>,
    body: Result<Json<CreateUnitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UnitResponse>), ApiError> {
    user.require(Permission::UnitsCreate)?;
    let request = json_body(body)?;

    PropertyRepository::new(&state.db)
        .get_property(property_id, user.scope())
        .await?
        .ok_or_else(|| not_found("Property not found"))?;

    let unit = UnitRepository::new(&state.db)
        .create_unit(NewUnit {
            property_id,
            number: request.number,
            rent: request.rent,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(unit.into())))
}

/// Assign a tenant to a unit or vacate it
#[utoipa::path(
    put,
    path = "/api/v1/units/{id}/tenant",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Unit UUID")
    ),
    request_body = AssignTenantRequest,
    responses(
        (status = 200, description = "Unit updated", body = UnitResponse),
        (status = 400, description = "Account is not a tenant", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Unit or tenant not found", body = ApiError)
    ),
    tag = "units"
)]
pub async fn assign_tenant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(unit_id): Path<Uuid>,
    body: Result<Json<AssignTenantRequest>, JsonRejection>,
) -> Result<Json<UnitResponse>, ApiError> {
    user.require(Permission::UnitsUpdate)?;
    let request = json_body(body)?;

    let unit = visible_unit(&state.db, unit_id, user.scope()).await?;
    let unit = UnitRepository::new(&state.db)
        .assign_tenant(unit, request.tenant_id)
        .await?;

    tracing::info!(%unit_id, tenant_id = ?unit.tenant_id, "Unit tenant updated");
    Ok(Json(unit.into()))
}
