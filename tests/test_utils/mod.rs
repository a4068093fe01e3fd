//! Test utilities for database and HTTP testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations, seeded accounts with access tokens, and a helper for
//! driving the router without binding a socket.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use migration::{Migrator, MigratorTrait};
use rentease::auth::JwtKeys;
use rentease::auth::password::hash_password;
use rentease::config::AppConfig;
use rentease::models::{PublicUser, Role, user};
use rentease::repositories::{NewUser, UserRepository};
use rentease::server::{AppState, create_app};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-integration-test";
pub const TEST_PASSWORD: &str = "Password123";

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// The pool is pinned to a single connection so every query sees the same
/// in-memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn test_config() -> AppConfig {
    AppConfig {
        profile: "test".to_string(),
        jwt_secret: Some(TEST_JWT_SECRET.to_string()),
        ..Default::default()
    }
}

pub fn test_keys() -> JwtKeys {
    JwtKeys::new(TEST_JWT_SECRET.as_bytes(), 3600)
}

pub fn test_app(db: DatabaseConnection) -> Router {
    create_app(AppState {
        config: Arc::new(test_config()),
        db,
        jwt: Arc::new(test_keys()),
    })
}

/// Inserts an account with [`TEST_PASSWORD`] and returns it with a valid access token.
pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    role: Role,
) -> Result<(user::Model, String)> {
    let password_hash =
        hash_password(TEST_PASSWORD).map_err(|e| anyhow::anyhow!("hashing failed: {e}"))?;
    let model = UserRepository::new(db)
        .create_user(NewUser {
            email: email.to_string(),
            password_hash,
            name: format!("Test {role}"),
            role,
        })
        .await?;

    let token = test_keys().issue(&PublicUser::from(model.clone()))?;
    Ok((model, token))
}

/// Sends one request through the router and returns the status and JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, json)
}
