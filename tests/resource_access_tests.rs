//! End-to-end tests for role permissions and ownership scoping across the
//! property, unit, lease, maintenance and payment endpoints.

#[path = "test_utils/mod.rs"]
mod test_utils;

use axum::{
    Router,
    http::{Method, StatusCode},
};
use rentease::models::Role;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde_json::{Value, json};
use test_utils::{create_user, send, setup_test_db, test_app};
use uuid::Uuid;

struct Fixture {
    db: DatabaseConnection,
    app: Router,
    admin: String,
    landlord: String,
    other_landlord: String,
    tenant: String,
    tenant_id: Uuid,
    outsider: String,
    property_id: String,
    unit_id: String,
}

/// One landlord owning "Maple Court" with unit 1A leased to `tenant`.
async fn fixture() -> Fixture {
    let db = setup_test_db().await.unwrap();
    let (_, admin) = create_user(&db, "admin@example.com", Role::Admin).await.unwrap();
    let (_, landlord) = create_user(&db, "landlord@example.com", Role::Landlord)
        .await
        .unwrap();
    let (_, other_landlord) = create_user(&db, "other@example.com", Role::Landlord)
        .await
        .unwrap();
    let (tenant_model, tenant) = create_user(&db, "tenant@example.com", Role::Tenant)
        .await
        .unwrap();
    let (_, outsider) = create_user(&db, "outsider@example.com", Role::Tenant)
        .await
        .unwrap();
    let app = test_app(db.clone());

    let (status, property) = send(
        &app,
        Method::POST,
        "/api/v1/properties",
        Some(&landlord),
        Some(json!({"name": "Maple Court", "address": "12 Maple Street"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{property}");
    let property_id = property["id"].as_str().unwrap().to_string();

    let (status, unit) = send(
        &app,
        Method::POST,
        &format!("/api/v1/properties/{property_id}/units"),
        Some(&landlord),
        Some(json!({"number": "1A", "rent": 1450.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{unit}");
    let unit_id = unit["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/units/{unit_id}/tenant"),
        Some(&landlord),
        Some(json!({"tenant_id": tenant_model.id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    Fixture {
        db,
        app,
        admin,
        landlord,
        other_landlord,
        tenant,
        tenant_id: tenant_model.id,
        outsider,
        property_id,
        unit_id,
    }
}

fn len(body: &Value) -> usize {
    body.as_array().map(Vec::len).unwrap_or_default()
}

#[tokio::test]
async fn properties_are_scoped_to_their_owner() {
    let f = fixture().await;
    let uri = format!("/api/v1/properties/{}", f.property_id);

    let (status, body) = send(&f.app, Method::GET, "/api/v1/properties", Some(&f.landlord), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 1);
    assert_eq!(body[0]["name"], "Maple Court");

    let (status, body) =
        send(&f.app, Method::GET, "/api/v1/properties", Some(&f.other_landlord), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 0);

    let (status, _) = send(&f.app, Method::GET, &uri, Some(&f.other_landlord), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&f.app, Method::GET, &uri, Some(&f.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "12 Maple Street");

    // Tenants have no property permissions at all.
    let (status, _) = send(&f.app, Method::GET, "/api/v1/properties", Some(&f.tenant), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(
        &f.app,
        Method::POST,
        "/api/v1/properties",
        Some(&f.tenant),
        Some(json!({"name": "Nope", "address": "Nowhere"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn property_creation_validates_owner_and_fields() {
    let f = fixture().await;

    let (status, body) = send(
        &f.app,
        Method::POST,
        "/api/v1/properties",
        Some(&f.landlord),
        Some(json!({"name": "  ", "address": "Somewhere"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    // Landlords cannot create on behalf of someone else.
    let (status, _) = send(
        &f.app,
        Method::POST,
        "/api/v1/properties",
        Some(&f.landlord),
        Some(json!({"name": "Elm House", "address": "1 Elm Road", "owner_id": f.tenant_id})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admins can, but only for landlords.
    let (status, _) = send(
        &f.app,
        Method::POST,
        "/api/v1/properties",
        Some(&f.admin),
        Some(json!({"name": "Elm House", "address": "1 Elm Road", "owner_id": f.tenant_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, landlords) = send(
        &f.app,
        Method::GET,
        "/api/v1/users?role=LANDLORD",
        Some(&f.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let other_id = landlords
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["email"] == "other@example.com")
        .map(|u| u["id"].clone())
        .unwrap();

    let (status, created) = send(
        &f.app,
        Method::POST,
        "/api/v1/properties",
        Some(&f.admin),
        Some(json!({"name": "Elm House", "address": "1 Elm Road", "owner_id": other_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["owner_id"], other_id);

    let (_, body) = send(&f.app, Method::GET, "/api/v1/properties", Some(&f.other_landlord), None).await;
    assert_eq!(len(&body), 1);
}

#[tokio::test]
async fn property_with_units_cannot_be_deleted() {
    let f = fixture().await;
    let uri = format!("/api/v1/properties/{}", f.property_id);

    let (status, _) = send(&f.app, Method::DELETE, &uri, Some(&f.other_landlord), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&f.app, Method::DELETE, &uri, Some(&f.landlord), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, empty) = send(
        &f.app,
        Method::POST,
        "/api/v1/properties",
        Some(&f.landlord),
        Some(json!({"name": "Empty Lot", "address": "9 Vacant Way"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let empty_uri = format!("/api/v1/properties/{}", empty["id"].as_str().unwrap());

    let (status, body) = send(&f.app, Method::DELETE, &empty_uri, Some(&f.landlord), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&f.app, Method::GET, &empty_uri, Some(&f.landlord), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn units_enforce_numbering_and_tenant_assignment_rules() {
    let f = fixture().await;
    let units_uri = format!("/api/v1/properties/{}/units", f.property_id);

    let (status, _) = send(
        &f.app,
        Method::POST,
        &units_uri,
        Some(&f.landlord),
        Some(json!({"number": "1A", "rent": 999.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &f.app,
        Method::POST,
        &units_uri,
        Some(&f.landlord),
        Some(json!({"number": "1B", "rent": -5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &f.app,
        Method::POST,
        &units_uri,
        Some(&f.other_landlord),
        Some(json!({"number": "9Z", "rent": 100.0})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, units) = send(&f.app, Method::GET, &units_uri, Some(&f.landlord), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&units), 1);
    assert_eq!(units[0]["tenant_id"], f.tenant_id.to_string());

    // Landlord accounts cannot be placed in a unit.
    let tenant_uri = format!("/api/v1/units/{}/tenant", f.unit_id);
    let (status, landlords) = send(&f.app, Method::GET, "/api/v1/users?role=LANDLORD", Some(&f.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &f.app,
        Method::PUT,
        &tenant_uri,
        Some(&f.landlord),
        Some(json!({"tenant_id": landlords[0]["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &f.app,
        Method::PUT,
        &tenant_uri,
        Some(&f.landlord),
        Some(json!({"tenant_id": Uuid::new_v4()})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, vacated) = send(
        &f.app,
        Method::PUT,
        &tenant_uri,
        Some(&f.landlord),
        Some(json!({"tenant_id": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(vacated["tenant_id"].is_null());
}

#[tokio::test]
async fn lease_lifecycle_respects_roles() {
    let f = fixture().await;

    let (status, lease) = send(
        &f.app,
        Method::POST,
        "/api/v1/leases",
        Some(&f.landlord),
        Some(json!({
            "unit_id": f.unit_id,
            "start_date": "2025-01-01",
            "end_date": "2025-12-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{lease}");
    assert_eq!(lease["status"], "PENDING");
    assert_eq!(lease["rent_amount"], 1450.0);
    assert_eq!(lease["deposit"], 0.0);
    let lease_uri = format!("/api/v1/leases/{}", lease["id"].as_str().unwrap());

    let (status, _) = send(
        &f.app,
        Method::POST,
        "/api/v1/leases",
        Some(&f.landlord),
        Some(json!({
            "unit_id": f.unit_id,
            "start_date": "2025-12-31",
            "end_date": "2025-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The assigned tenant can read the lease; others cannot see it.
    let (status, body) = send(&f.app, Method::GET, &lease_uri, Some(&f.tenant), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unit_id"], f.unit_id);

    let (status, _) = send(&f.app, Method::GET, &lease_uri, Some(&f.outsider), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&f.app, Method::GET, "/api/v1/leases", Some(&f.outsider), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 0);
    let (_, body) = send(&f.app, Method::GET, "/api/v1/leases", Some(&f.other_landlord), None).await;
    assert_eq!(len(&body), 0);
    let (_, body) = send(&f.app, Method::GET, "/api/v1/leases", Some(&f.admin), None).await;
    assert_eq!(len(&body), 1);

    // Tenants may not change lease status.
    let status_uri = format!("{lease_uri}/status");
    let (status, _) = send(
        &f.app,
        Method::PATCH,
        &status_uri,
        Some(&f.tenant),
        Some(json!({"status": "ACTIVE"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &f.app,
        Method::PATCH,
        &status_uri,
        Some(&f.landlord),
        Some(json!({"status": "TERMINATED"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "TERMINATED");
    assert!(body["next_rent_due"].is_null());
}

#[tokio::test]
async fn maintenance_requests_flow_from_tenant_to_landlord() {
    let f = fixture().await;

    let (status, created) = send(
        &f.app,
        Method::POST,
        "/api/v1/maintenance-requests",
        Some(&f.tenant),
        Some(json!({
            "title": "Leaking kitchen tap",
            "description": "Drips constantly",
            "unit_id": f.unit_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["priority"], "MEDIUM");

    // A tenant not living in the unit cannot file against it.
    let (status, _) = send(
        &f.app,
        Method::POST,
        "/api/v1/maintenance-requests",
        Some(&f.outsider),
        Some(json!({"title": "Not mine", "unit_id": f.unit_id})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Landlords triage but do not file requests.
    let (status, _) = send(
        &f.app,
        Method::POST,
        "/api/v1/maintenance-requests",
        Some(&f.landlord),
        Some(json!({"title": "Paint hallway", "unit_id": f.unit_id})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let status_uri = format!(
        "/api/v1/maintenance-requests/{}/status",
        created["id"].as_str().unwrap()
    );
    let (status, _) = send(
        &f.app,
        Method::PATCH,
        &status_uri,
        Some(&f.tenant),
        Some(json!({"status": "COMPLETED"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &f.app,
        Method::PATCH,
        &status_uri,
        Some(&f.other_landlord),
        Some(json!({"status": "COMPLETED"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, updated) = send(
        &f.app,
        Method::PATCH,
        &status_uri,
        Some(&f.landlord),
        Some(json!({"status": "IN_PROGRESS"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "IN_PROGRESS");

    let (status, body) = send(
        &f.app,
        Method::GET,
        "/api/v1/maintenance-requests?status=IN_PROGRESS",
        Some(&f.tenant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 1);

    let (_, body) = send(
        &f.app,
        Method::GET,
        "/api/v1/maintenance-requests?status=PENDING",
        Some(&f.landlord),
        None,
    )
    .await;
    assert_eq!(len(&body), 0);

    let (_, body) = send(
        &f.app,
        Method::GET,
        "/api/v1/maintenance-requests",
        Some(&f.outsider),
        None,
    )
    .await;
    assert_eq!(len(&body), 0);
}

#[tokio::test]
async fn payments_report_display_amount_and_lateness() {
    let f = fixture().await;

    let (status, payment) = send(
        &f.app,
        Method::POST,
        "/api/v1/payments",
        Some(&f.tenant),
        Some(json!({
            "amount": 1450.0,
            "unit_id": f.unit_id,
            "due_date": "2020-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{payment}");
    assert_eq!(payment["status"], "PENDING");
    assert_eq!(payment["type"], "RENT");
    assert_eq!(payment["amount_display"], "$1,450.00");
    assert_eq!(payment["is_late"], true);

    let (status, _) = send(
        &f.app,
        Method::POST,
        "/api/v1/payments",
        Some(&f.tenant),
        Some(json!({"amount": 0.0, "unit_id": f.unit_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, fee) = send(
        &f.app,
        Method::POST,
        "/api/v1/payments",
        Some(&f.landlord),
        Some(json!({"amount": 75.0, "type": "LATE_FEE", "unit_id": f.unit_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(fee["type"], "LATE_FEE");
    assert_eq!(fee["is_late"], false);

    let status_uri = format!("/api/v1/payments/{}/status", payment["id"].as_str().unwrap());
    let (status, _) = send(
        &f.app,
        Method::PATCH,
        &status_uri,
        Some(&f.tenant),
        Some(json!({"status": "COMPLETED"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, settled) = send(
        &f.app,
        Method::PATCH,
        &status_uri,
        Some(&f.landlord),
        Some(json!({"status": "COMPLETED"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settled["status"], "COMPLETED");
    assert_eq!(settled["is_late"], false);

    let (_, body) = send(&f.app, Method::GET, "/api/v1/payments", Some(&f.tenant), None).await;
    assert_eq!(len(&body), 2);
    let (_, body) = send(&f.app, Method::GET, "/api/v1/payments", Some(&f.outsider), None).await;
    assert_eq!(len(&body), 0);
    let (_, body) = send(&f.app, Method::GET, "/api/v1/payments", Some(&f.admin), None).await;
    assert_eq!(len(&body), 2);
}

#[tokio::test]
async fn malformed_list_filters_are_rejected_as_validation_errors() {
    let f = fixture().await;

    let (status, body) = send(
        &f.app,
        Method::GET,
        "/api/v1/maintenance-requests?status=BOGUS",
        Some(&f.landlord),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query string")
    );

    let (status, body) = send(
        &f.app,
        Method::GET,
        "/api/v1/users?role=JANITOR",
        Some(&f.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn unit_lookup_failures_are_not_reported_as_missing_records() {
    let f = fixture().await;

    let (status, lease) = send(
        &f.app,
        Method::POST,
        "/api/v1/leases",
        Some(&f.landlord),
        Some(json!({
            "unit_id": f.unit_id,
            "start_date": "2025-01-01",
            "end_date": "2025-12-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{lease}");
    let (status, payment) = send(
        &f.app,
        Method::POST,
        "/api/v1/payments",
        Some(&f.tenant),
        Some(json!({"amount": 1450.0, "unit_id": f.unit_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{payment}");
    let (status, request) = send(
        &f.app,
        Method::POST,
        "/api/v1/maintenance-requests",
        Some(&f.tenant),
        Some(json!({
            "title": "Leaking tap",
            "description": "Kitchen tap drips all night",
            "unit_id": f.unit_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{request}");

    // Leases, payments and requests stay readable; only the unit lookup fails.
    f.db
        .execute_unprepared("ALTER TABLE units RENAME TO units_archived")
        .await
        .unwrap();

    let lease_uri = format!("/api/v1/leases/{}", lease["id"].as_str().unwrap());
    let (status, body) = send(&f.app, Method::GET, &lease_uri, Some(&f.landlord), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{body}");
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");

    let payment_uri = format!("/api/v1/payments/{}/status", payment["id"].as_str().unwrap());
    let (status, _) = send(
        &f.app,
        Method::PATCH,
        &payment_uri,
        Some(&f.landlord),
        Some(json!({"status": "COMPLETED"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let request_uri = format!(
        "/api/v1/maintenance-requests/{}/status",
        request["id"].as_str().unwrap()
    );
    let (status, _) = send(
        &f.app,
        Method::PATCH,
        &request_uri,
        Some(&f.landlord),
        Some(json!({"status": "IN_PROGRESS"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
