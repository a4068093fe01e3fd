//! Router-level tests that need a live database or non-default configuration.

#[path = "test_utils/mod.rs"]
mod test_utils;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use rentease::server::{AppState, create_app};
use test_utils::{send, setup_test_db, test_app, test_config, test_keys};
use tower::ServiceExt;

#[tokio::test]
async fn readiness_reports_database_reachable() {
    let db = setup_test_db().await.unwrap();
    let app = test_app(db);

    let (status, body) = send(&app, Method::GET, "/readyz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn readiness_fails_once_database_is_closed() {
    let db = setup_test_db().await.unwrap();
    let app = test_app(db.clone());
    db.close().await.unwrap();

    let (status, body) = send(&app, Method::GET, "/readyz", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn configured_origins_receive_cors_headers() {
    let db = setup_test_db().await.unwrap();
    let mut config = test_config();
    config.cors_allowed_origins = vec!["http://localhost:3000".to_string()];

    let app = create_app(AppState {
        config: Arc::new(config),
        db,
        jwt: Arc::new(test_keys()),
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}
