//! # Lease Repository

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::LeaseStatus;
use crate::models::lease::{
    self, ActiveModel as LeaseActiveModel, Entity as Lease, Model as LeaseModel,
};

/// Request data for creating a lease
#[derive(Debug, Clone)]
pub struct NewLease {
    pub unit_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rent_amount: f64,
    pub deposit: f64,
    pub status: LeaseStatus,
}

/// Repository for Lease database operations
pub struct LeaseRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LeaseRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create_lease(&self, request: NewLease) -> Result<LeaseModel, RepositoryError> {
        if request.end_date <= request.start_date {
            return Err(RepositoryError::validation_error(
                "end_date",
                "Lease must end after it starts",
            ));
        }
        if !request.rent_amount.is_finite() || request.rent_amount < 0.0 {
            return Err(RepositoryError::validation_error(
                "rent_amount",
                "Rent must be a non-negative amount",
            ));
        }
        if !request.deposit.is_finite() || request.deposit < 0.0 {
            return Err(RepositoryError::validation_error(
                "deposit",
                "Deposit must be a non-negative amount",
            ));
        }

        let now = Utc::now();
        let lease = LeaseActiveModel {
            id: Set(Uuid::new_v4()),
            unit_id: Set(request.unit_id),
            start_date: Set(request.start_date),
            end_date: Set(request.end_date),
            rent_amount: Set(request.rent_amount),
            deposit: Set(request.deposit),
            status: Set(request.status),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        lease
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get_lease(&self, id: Uuid) -> Result<Option<LeaseModel>, RepositoryError> {
        Lease::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// List leases, newest start date first. `unit_ids` restricts the result
    /// to those units when present.
    pub async fn list_leases(
        &self,
        unit_ids: Option<&[Uuid]>,
    ) -> Result<Vec<LeaseModel>, RepositoryError> {
        let mut query = Lease::find().order_by_desc(lease::Column::StartDate);
        if let Some(ids) = unit_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(lease::Column::UnitId.is_in(ids.iter().copied()));
        }

        query
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn update_status(
        &self,
        lease: LeaseModel,
        status: LeaseStatus,
    ) -> Result<LeaseModel, RepositoryError> {
        let mut active_lease = lease.into_active_model();
        active_lease.status = Set(status);
        active_lease.updated_at = Set(Utc::now().into());

        active_lease
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
