//! # Properties API Handlers
//!
//! Landlords manage the properties they own; admins see and manage all of them.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::json_body;
use crate::auth::AuthUser;
use crate::error::{ApiError, forbidden, not_found, validation_error};
use crate::models::Role;
use crate::models::property::Model as PropertyModel;
use crate::permissions::Permission;
use crate::repositories::{NewProperty, PropertyRepository, UserRepository};
use crate::server::AppState;

/// Request payload for creating a property
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePropertyRequest {
    #[schema(example = "Maple Court")]
    pub name: String,
    #[schema(example = "12 Maple Street, Springfield")]
    pub address: String,
    /// Owning landlord. Only admins may create on behalf of another account;
    /// defaults to the caller.
    pub owner_id: Option<Uuid>,
}

/// Property as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PropertyResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub owner_id: Uuid,
    /// Creation timestamp (ISO 8601)
    #[schema(example = "2025-01-15T10:30:00+00:00")]
    pub created_at: String,
}

impl From<PropertyModel> for PropertyResponse {
    fn from(model: PropertyModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            owner_id: model.owner_id,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// List properties visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Properties ordered by name", body = Vec<PropertyResponse>),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "properties"
)]
pub async fn list_properties(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<PropertyResponse>>, ApiError> {
    user.require(Permission::PropertiesRead)?;

    let properties = PropertyRepository::new(&state.db)
        .list_properties(user.scope())
        .await?;

    Ok(Json(properties.into_iter().map(Into::into).collect()))
}

/// Create a property
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    security(("bearer_auth" = [])),
    request_body = CreatePropertyRequest,
    responses(
        (status = 201, description = "Property created", body = PropertyResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "properties"
)]
pub async fn create_property(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<CreatePropertyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PropertyResponse>), ApiError> {
    user.require(Permission::PropertiesCreate)?;
    let request = json_body(body)?;

    let owner_id = match request.owner_id {
        Some(owner_id) if owner_id != user.id => {
            if user.role != Role::Admin {
                return Err(forbidden(Some(
                    "Only admins can create properties for another owner",
                )));
            }
            let owner = UserRepository::new(&state.db).get_user(owner_id).await?;
            if !owner.is_some_and(|owner| owner.role == Role::Landlord) {
                return Err(validation_error(
                    "Owner must be an existing LANDLORD account",
                    serde_json::json!({ "owner_id": "Unknown landlord" }),
                ));
            }
            owner_id
        }
        _ => user.id,
    };

    let property = PropertyRepository::new(&state.db)
        .create_property(NewProperty {
            name: request.name,
            address: request.address,
            owner_id,
        })
        .await?;

    tracing::info!(property_id = %property.id, owner_id = %owner_id, "Property created");
    Ok((StatusCode::CREATED, Json(property.into())))
}

/// Get one property
#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Property UUID")
    ),
    responses(
        (status = 200, description = "Property", body = PropertyResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Property not found", body = ApiError)
    ),
    tag = "properties"
)]
pub async fn get_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(property_id): Path<Uuid>,
) -> Result<Json<PropertyResponse>, ApiError> {
    user.require(Permission::PropertiesRead)?;

    let property = PropertyRepository::new(&state.db)
        .get_property(property_id, user.scope())
        .await?
        .ok_or_else(|| not_found("Property not found"))?;

    Ok(Json(property.into()))
}

/// Delete a property with no units
#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Property UUID")
    ),
    responses(
        (status = 204, description = "Property deleted"),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Property not found", body = ApiError),
        (status = 409, description = "Property still has units", body = ApiError)
    ),
    tag = "properties"
)]
pub async fn delete_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(property_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user.require(Permission::PropertiesDelete)?;

    let repo = PropertyRepository::new(&state.db);
    let property = repo
        .get_property(property_id, user.scope())
        .await?
        .ok_or_else(|| not_found("Property not found"))?;

    repo.delete_property(property).await?;
    tracing::info!(%property_id, "Property deleted");

    Ok(StatusCode::NO_CONTENT)
}
