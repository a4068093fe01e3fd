//! # Auth API Handlers
//!
//! Login, registration and current-user lookup.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::json_body;
use crate::auth::{AuthResponse, AuthService, AuthUser, RegisterInput};
use crate::error::{ApiError, unauthorized};
use crate::models::PublicUser;
use crate::repositories::UserRepository;
use crate::server::AppState;

/// Login credentials
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "Secret123")]
    pub password: String,
}

/// Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 400, description = "Malformed request body", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let request = json_body(body)?;
    let response = AuthService::new(&state.db, &state.jwt)
        .authenticate(&request.email, &request.password)
        .await?;

    Ok(Json(response))
}

/// Create an account and return an access token for it
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterInput,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let input = json_body(body)?;
    let response = AuthService::new(&state.db, &state.jwt)
        .register(input)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Current user behind the bearer token
#[utoipa::path(
    get,
    path = "/auth/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated user", body = PublicUser),
        (status = 401, description = "Missing, invalid or stale bearer token", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let account = UserRepository::new(&state.db)
        .get_user(user.id)
        .await?
        .ok_or_else(|| unauthorized(Some("Account no longer exists")))?;

    Ok(Json(account.into()))
}
