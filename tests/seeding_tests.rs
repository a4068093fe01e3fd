//! Integration tests for demo seeding and database cleanup.

#[path = "test_utils/mod.rs"]
mod test_utils;

use axum::http::{Method, StatusCode};
use rentease::models::{self, LeaseStatus, Role};
use rentease::repositories::{AccessScope, LeaseRepository, UnitRepository, UserRepository};
use rentease::seeds::{DEMO_PASSWORD, clean_database, seed_demo_data};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use test_utils::{send, setup_test_db, test_app};

#[tokio::test]
async fn seeding_populates_demo_portfolio() {
    let db = setup_test_db().await.unwrap();

    let summary = seed_demo_data(&db).await.expect("seed succeeds");
    assert_eq!(summary.users, 4);
    assert_eq!(summary.properties, 1);
    assert_eq!(summary.units, 3);
    assert_eq!(summary.leases, 2);
    assert_eq!(summary.maintenance_requests, 2);
    assert_eq!(summary.payments, 3);

    let users = UserRepository::new(&db);
    assert_eq!(users.count_users().await.unwrap(), 4);
    assert_eq!(users.list_users(Some(Role::Tenant)).await.unwrap().len(), 2);

    let leases = LeaseRepository::new(&db).list_leases(None).await.unwrap();
    assert!(leases.iter().any(|l| l.status == LeaseStatus::Active));
    assert!(leases.iter().any(|l| l.status == LeaseStatus::Pending));

    let tenant = users
        .find_by_email("tenant@rentease.dev")
        .await
        .unwrap()
        .expect("demo tenant exists");
    let visible = UnitRepository::new(&db)
        .visible_unit_ids(AccessScope::Tenant(tenant.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(visible.len(), 1);
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let db = setup_test_db().await.unwrap();

    assert!(!seed_demo_data(&db).await.unwrap().is_empty());
    assert!(seed_demo_data(&db).await.unwrap().is_empty());

    assert_eq!(models::Property::find().count(&db).await.unwrap(), 1);
    assert_eq!(models::Payment::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn demo_accounts_can_log_in() {
    let db = setup_test_db().await.unwrap();
    seed_demo_data(&db).await.unwrap();
    let app = test_app(db);

    for email in [
        "admin@rentease.dev",
        "landlord@rentease.dev",
        "tenant@rentease.dev",
    ] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": email, "password": DEMO_PASSWORD})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{email}");
        assert_eq!(body["user"]["email"], email);
    }
}

#[tokio::test]
async fn clean_database_removes_everything() {
    let db = setup_test_db().await.unwrap();
    seed_demo_data(&db).await.unwrap();

    clean_database(&db).await.expect("clean succeeds");

    assert_eq!(models::User::find().count(&db).await.unwrap(), 0);
    assert_eq!(models::Property::find().count(&db).await.unwrap(), 0);
    assert_eq!(models::Unit::find().count(&db).await.unwrap(), 0);
    assert_eq!(models::Lease::find().count(&db).await.unwrap(), 0);
    assert_eq!(models::MaintenanceRequest::find().count(&db).await.unwrap(), 0);
    assert_eq!(models::Payment::find().count(&db).await.unwrap(), 0);

    // A cleaned database can be seeded again.
    assert!(!seed_demo_data(&db).await.unwrap().is_empty());
}
