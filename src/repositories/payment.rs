//! # Payment Repository

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::payment::{
    self, ActiveModel as PaymentActiveModel, Entity as Payment, Model as PaymentModel,
};
use crate::models::{PaymentStatus, PaymentType};

/// Request data for recording a payment
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub amount: f64,
    pub payment_type: PaymentType,
    pub unit_id: Uuid,
    pub creator_id: Uuid,
    pub due_date: Option<NaiveDate>,
}

/// Repository for Payment database operations
pub struct PaymentRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PaymentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Record a payment. New payments always start as `PENDING`.
    pub async fn create_payment(&self, request: NewPayment) -> Result<PaymentModel, RepositoryError> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(RepositoryError::validation_error(
                "amount",
                "Amount must be greater than zero",
            ));
        }

        let now = Utc::now();
        let model = PaymentActiveModel {
            id: Set(Uuid::new_v4()),
            amount: Set(request.amount),
            status: Set(PaymentStatus::Pending),
            payment_type: Set(request.payment_type),
            unit_id: Set(request.unit_id),
            creator_id: Set(request.creator_id),
            due_date: Set(request.due_date),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        model
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get_payment(&self, id: Uuid) -> Result<Option<PaymentModel>, RepositoryError> {
        Payment::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// List payments, newest first, optionally restricted to `unit_ids`.
    pub async fn list_payments(
        &self,
        unit_ids: Option<&[Uuid]>,
    ) -> Result<Vec<PaymentModel>, RepositoryError> {
        let mut query = Payment::find().order_by_desc(payment::Column::CreatedAt);
        if let Some(ids) = unit_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(payment::Column::UnitId.is_in(ids.iter().copied()));
        }

        query
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn update_status(
        &self,
        payment: PaymentModel,
        status: PaymentStatus,
    ) -> Result<PaymentModel, RepositoryError> {
        let mut active_payment = payment.into_active_model();
        active_payment.status = Set(status);
        active_payment.updated_at = Set(Utc::now().into());

        active_payment
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
