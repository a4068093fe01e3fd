//! # Payments API Handlers

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{ensure_unit_visible, json_body, visible_unit};
use crate::auth::AuthUser;
use crate::error::{ApiError, not_found};
use crate::models::payment::Model as PaymentModel;
use crate::models::{PaymentStatus, PaymentType};
use crate::permissions::Permission;
use crate::repositories::{NewPayment, PaymentRepository, UnitRepository};
use crate::server::AppState;
use crate::utils::{format_currency, is_payment_late};

/// Request payload for recording a payment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    #[schema(example = 1450.0)]
    pub amount: f64,
    /// Defaults to RENT
    #[serde(rename = "type")]
    pub payment_type: Option<PaymentType>,
    pub unit_id: Uuid,
    #[schema(example = "2025-03-01")]
    pub due_date: Option<NaiveDate>,
}

/// Request payload for changing a payment status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}

/// Payment as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub amount: f64,
    /// Amount rendered for display, e.g. `$1,450.00`
    pub amount_display: String,
    pub status: PaymentStatus,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub unit_id: Uuid,
    pub creator_id: Uuid,
    pub due_date: Option<NaiveDate>,
    /// Pending and more than one day past its due date
    pub is_late: bool,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl PaymentResponse {
    fn from_model(model: PaymentModel, now: DateTime<Utc>) -> Self {
        let is_late = model.status == PaymentStatus::Pending
            && model.due_date.is_some_and(|due| is_payment_late(due, now));

        Self {
            id: model.id,
            amount: model.amount,
            amount_display: format_currency(model.amount),
            status: model.status,
            payment_type: model.payment_type,
            unit_id: model.unit_id,
            creator_id: model.creator_id,
            due_date: model.due_date,
            is_late,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

impl From<PaymentModel> for PaymentResponse {
    fn from(model: PaymentModel) -> Self {
        Self::from_model(model, Utc::now())
    }
}

/// List payments on units visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payments, newest first", body = Vec<PaymentResponse>),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError)
    ),
    tag = "payments"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    user.require(Permission::PaymentsRead)?;

    let unit_ids = UnitRepository::new(&state.db)
        .visible_unit_ids(user.scope())
        .await?;
    let payments = PaymentRepository::new(&state.db)
        .list_payments(unit_ids.as_deref())
        .await?;

    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

/// Record a payment against a unit
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    security(("bearer_auth" = [])),
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Unit not found", body = ApiError)
    ),
    tag = "payments"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    user.require(Permission::PaymentsCreate)?;
    let request = json_body(body)?;

    let unit = visible_unit(&state.db, request.unit_id, user.scope()).await?;
    let payment = PaymentRepository::new(&state.db)
        .create_payment(NewPayment {
            amount: request.amount,
            payment_type: request.payment_type.unwrap_or(PaymentType::Rent),
            unit_id: unit.id,
            creator_id: user.id,
            due_date: request.due_date,
        })
        .await?;

    tracing::info!(payment_id = %payment.id, unit_id = %unit.id, "Payment recorded");
    Ok((StatusCode::CREATED, Json(payment.into())))
}

/// Change a payment status
#[utoipa::path(
    patch,
    path = "/api/v1/payments/{id}/status",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Payment UUID")
    ),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Payment updated", body = PaymentResponse),
        (status = 400, description = "Unknown status", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 403, description = "Insufficient permissions", body = ApiError),
        (status = 404, description = "Payment not found", body = ApiError)
    ),
    tag = "payments"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(payment_id): Path<Uuid>,
    body: Result<Json<UpdatePaymentStatusRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    user.require(Permission::PaymentsUpdate)?;
    let request = json_body(body)?;

    let repo = PaymentRepository::new(&state.db);
    let payment = repo
        .get_payment(payment_id)
        .await?
        .ok_or_else(|| not_found("Payment not found"))?;
    ensure_unit_visible(&state.db, payment.unit_id, user.scope(), "Payment not found").await?;

    let payment = repo.update_status(payment, request.status).await?;
    Ok(Json(payment.into()))
}
