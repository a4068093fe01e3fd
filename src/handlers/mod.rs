//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the RentEase API.

use axum::{
    extract::{
        Query,
        rejection::{JsonRejection, QueryRejection},
    },
    response::Json,
};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::error::{ApiError, not_found};
use crate::models::ServiceInfo;
use crate::models::unit::Model as UnitModel;
use crate::repositories::{AccessScope, UnitRepository};

pub mod auth;
pub mod health;
pub mod leases;
pub mod maintenance;
pub mod payments;
pub mod properties;
pub mod units;
pub mod users;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Unwrap a JSON body, turning extractor rejections into problem+json errors.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(ApiError::from)
}

/// Unwrap query parameters, turning extractor rejections into problem+json errors.
pub(crate) fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query.map(|Query(value)| value).map_err(ApiError::from)
}

/// Load a unit the caller can see. Invisible units are reported as missing.
pub(crate) async fn visible_unit(
    db: &DatabaseConnection,
    unit_id: Uuid,
    scope: AccessScope,
) -> Result<UnitModel, ApiError> {
    UnitRepository::new(db)
        .get_unit(unit_id, scope)
        .await?
        .ok_or_else(|| not_found("Unit not found"))
}

/// Check that a record's unit is visible to the caller, reporting `missing` when it is not.
/// Database failures propagate unchanged.
pub(crate) async fn ensure_unit_visible(
    db: &DatabaseConnection,
    unit_id: Uuid,
    scope: AccessScope,
    missing: &str,
) -> Result<(), ApiError> {
    match UnitRepository::new(db).get_unit(unit_id, scope).await? {
        Some(_) => Ok(()),
        None => Err(not_found(missing)),
    }
}
