//! # Users API Handlers

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::query_params;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{PublicUser, Role};
use crate::permissions::Permission;
use crate::repositories::UserRepository;
use crate::server::AppState;

/// Query parameters for the user listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// Only return users with this role
    pub role: Option<Role>,
}

/// List accounts (ADMIN only)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    security(("bearer_auth" = [])),
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Accounts ordered by email", body = Vec<PublicUser>),
        (status = 400, description = "Invalid query string", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    user.require(Permission::UsersRead)?;
    let query = query_params(query)?;

    let users = UserRepository::new(&state.db)
        .list_users(query.role)
        .await?
        .into_iter()
        .map(PublicUser::from)
        .collect();

    Ok(Json(users))
}
