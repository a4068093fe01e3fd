//! # Authentication and Authorization
//!
//! Bearer JWT authentication for protected API endpoints, plus the
//! role-to-permission checks and row scoping derived from the caller.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::error::{ApiError, forbidden, unauthorized, unauthorized_with_trace_id};
use crate::models::Role;
use crate::permissions::{Permission, has_permission};
use crate::repositories::AccessScope;
use crate::telemetry::TraceContext;

pub mod jwt;
pub mod password;
pub mod service;

pub use jwt::{Claims, JwtKeys};
pub use service::{AuthError, AuthResponse, AuthService, RegisterInput};

/// Caller identity decoded from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Fail with 403 unless the caller's role grants `permission`.
    pub fn require(&self, permission: Permission) -> Result<(), ApiError> {
        if has_permission(self.role, permission) {
            Ok(())
        } else {
            tracing::debug!(user_id = %self.id, role = %self.role, %permission, "Permission denied");
            Err(forbidden(Some(&format!("Missing permission {permission}"))))
        }
    }

    /// Rows this caller may see.
    pub fn scope(&self) -> AccessScope {
        match self.role {
            Role::Admin => AccessScope::All,
            Role::Landlord => AccessScope::Owner(self.id),
            Role::Tenant => AccessScope::Tenant(self.id),
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header")?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or("Authorization header must use Bearer scheme")
}

fn reject(message: &str, trace_id: Option<String>) -> ApiError {
    match trace_id {
        Some(trace_id) => unauthorized_with_trace_id(Some(message), trace_id),
        None => unauthorized(Some(message)),
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<JwtKeys>: FromRef<S>,
    S: Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract trace_id from request context for consistent error responses
        let trace_id = parts
            .extensions
            .get::<TraceContext>()
            .map(|ctx| ctx.trace_id.clone());

        let token =
            extract_bearer_token(&parts.headers).map_err(|msg| reject(msg, trace_id.clone()))?;

        let keys = Arc::<JwtKeys>::from_ref(state);
        let claims = keys.verify(token).map_err(|err| {
            tracing::debug!(error = %err, "Rejected access token");
            reject("Invalid or expired token", trace_id)
        })?;

        Ok(claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PublicUser;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        response::Response,
        routing::get,
    };
    use tower::ServiceExt;

    const SECRET: &[u8] = b"extractor-test-secret-extractor-test";

    async fn whoami(user: AuthUser) -> String {
        format!("{}:{}", user.email, user.role)
    }

    async fn send(keys: Arc<JwtKeys>, authorization: Option<String>) -> Response {
        let mut request = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            request = request.header("Authorization", value);
        }

        Router::new()
            .route("/whoami", get(whoami))
            .with_state(keys)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn token_for(keys: &JwtKeys, role: Role) -> String {
        keys.issue(&PublicUser {
            id: Uuid::new_v4(),
            email: "caller@example.com".to_string(),
            name: "Caller".to_string(),
            role,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn missing_auth_header_returns_401() {
        let keys = Arc::new(JwtKeys::new(SECRET, 3600));
        let response = send(keys, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/problem+json"
        );
    }

    #[tokio::test]
    async fn invalid_auth_scheme_returns_401() {
        let keys = Arc::new(JwtKeys::new(SECRET, 3600));
        let response = send(keys, Some("Basic dGVzdDoxMjM=".to_string())).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_returns_401() {
        let keys = Arc::new(JwtKeys::new(SECRET, 3600));
        let response = send(keys, Some("Bearer not-a-jwt".to_string())).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_passes_through() {
        let keys = Arc::new(JwtKeys::new(SECRET, 3600));
        let token = token_for(&keys, Role::Landlord);

        let response = send(keys, Some(format!("Bearer {token}"))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"caller@example.com:LANDLORD");
    }

    #[test]
    fn require_checks_role_table() {
        let tenant = AuthUser {
            id: Uuid::new_v4(),
            email: "t@example.com".to_string(),
            role: Role::Tenant,
        };

        assert!(tenant.require(Permission::MaintenanceCreate).is_ok());
        let err = tenant.require(Permission::PropertiesCreate).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(tenant.scope(), AccessScope::Tenant(tenant.id));
    }

    #[test]
    fn scope_follows_role() {
        let id = Uuid::new_v4();
        let user = |role| AuthUser {
            id,
            email: "x@example.com".to_string(),
            role,
        };

        assert_eq!(user(Role::Admin).scope(), AccessScope::All);
        assert_eq!(user(Role::Landlord).scope(), AccessScope::Owner(id));
    }
}
