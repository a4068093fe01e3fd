//! # Auth Service
//!
//! Credential checks, account registration and access-token issuance.

use axum::http::StatusCode;
use metrics::counter;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use crate::error::{ApiError, RepositoryError, is_unique_violation, unauthorized, validation_error};
use crate::models::{PublicUser, Role};
use crate::repositories::{NewUser, UserRepository};
use crate::utils::{is_valid_email, is_valid_password};

/// Token plus the authenticated user, returned by login and register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub user: PublicUser,
}

/// Registration input.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterInput {
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "Secret123")]
    pub password: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Email already registered")]
    EmailTaken,
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("failed to sign access token: {0}")]
    TokenIssue(#[source] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error("password task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    fn validation(field: &'static str, message: &str) -> Self {
        Self::Validation {
            field,
            message: message.to_string(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => unauthorized(Some("Invalid credentials")),
            AuthError::EmailTaken => {
                ApiError::new(StatusCode::CONFLICT, "CONFLICT", "Email already registered")
            }
            AuthError::Validation { field, message } => {
                validation_error(&message, serde_json::json!({ field: message }))
            }
            AuthError::Repository(err) => err.into(),
            other => {
                tracing::error!(error = %other, "Authentication failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "An internal error occurred",
                )
            }
        }
    }
}

/// Authentication operations over the users table.
pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    jwt: &'a JwtKeys,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection, jwt: &'a JwtKeys) -> Self {
        Self { db, jwt }
    }

    /// Returns the user without its password hash when the credentials match,
    /// `None` for an unknown email or a wrong password.
    pub async fn validate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<PublicUser>, AuthError> {
        let email = normalize_email(email);
        let Some(user) = UserRepository::new(self.db).find_by_email(&email).await? else {
            return Ok(None);
        };

        let password = password.to_owned();
        let stored_hash = user.password.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await?;

        Ok(matches.then(|| PublicUser::from(user)))
    }

    /// Issue an access token for an already-validated user.
    pub fn login(&self, user: PublicUser) -> Result<AuthResponse, AuthError> {
        let access_token = self.jwt.issue(&user).map_err(AuthError::TokenIssue)?;
        Ok(AuthResponse { access_token, user })
    }

    /// Validate credentials and issue a token in one step.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AuthError> {
        let Some(user) = self.validate_user(email, password).await? else {
            counter!("auth_login_total", "outcome" => "rejected").increment(1);
            tracing::info!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        counter!("auth_login_total", "outcome" => "success").increment(1);
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        self.login(user)
    }

    /// Create an account and log it in. Fails with [`AuthError::EmailTaken`]
    /// when the email is already registered.
    pub async fn register(&self, input: RegisterInput) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&input.email);
        if !is_valid_email(&email) {
            return Err(AuthError::validation("email", "Invalid email format"));
        }
        if !is_valid_password(&input.password) {
            return Err(AuthError::validation(
                "password",
                "Password must be at least 8 characters and contain an uppercase letter, a lowercase letter and a number",
            ));
        }
        if input.name.trim().is_empty() {
            return Err(AuthError::validation("name", "Name is required"));
        }

        let users = UserRepository::new(self.db);
        if users.find_by_email(&email).await?.is_some() {
            counter!("auth_register_total", "outcome" => "conflict").increment(1);
            return Err(AuthError::EmailTaken);
        }

        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        let created = users
            .create_user(NewUser {
                email,
                password_hash,
                name: input.name,
                role: input.role,
            })
            .await
            .map_err(|err| match err {
                RepositoryError::Database(db_err) if is_unique_violation(&db_err) => {
                    AuthError::EmailTaken
                }
                other => AuthError::Repository(other),
            })?;

        counter!("auth_register_total", "outcome" => "success").increment(1);
        tracing::info!(user_id = %created.id, role = %created.role, "User registered");
        self.login(created.into())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
