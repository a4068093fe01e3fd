//! # Maintenance Request Repository

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::maintenance_request::{
    self, ActiveModel as MaintenanceRequestActiveModel, Entity as MaintenanceRequest,
    Model as MaintenanceRequestModel,
};
use crate::models::{MaintenancePriority, MaintenanceStatus};

/// Request data for filing a maintenance request
#[derive(Debug, Clone)]
pub struct NewMaintenanceRequest {
    pub title: String,
    pub description: String,
    pub priority: MaintenancePriority,
    pub unit_id: Uuid,
    pub creator_id: Uuid,
}

/// Repository for MaintenanceRequest database operations
pub struct MaintenanceRequestRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MaintenanceRequestRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// File a new request. New requests always start as `PENDING`.
    pub async fn create_request(
        &self,
        request: NewMaintenanceRequest,
    ) -> Result<MaintenanceRequestModel, RepositoryError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(RepositoryError::validation_error(
                "title",
                "Title cannot be empty",
            ));
        }

        let now = Utc::now();
        let model = MaintenanceRequestActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title.to_string()),
            description: Set(request.description.trim().to_string()),
            status: Set(MaintenanceStatus::Pending),
            priority: Set(request.priority),
            unit_id: Set(request.unit_id),
            creator_id: Set(request.creator_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        model
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get_request(
        &self,
        id: Uuid,
    ) -> Result<Option<MaintenanceRequestModel>, RepositoryError> {
        MaintenanceRequest::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// List requests, newest first, optionally restricted to `unit_ids` and one status.
    pub async fn list_requests(
        &self,
        unit_ids: Option<&[Uuid]>,
        status: Option<MaintenanceStatus>,
    ) -> Result<Vec<MaintenanceRequestModel>, RepositoryError> {
        let mut query =
            MaintenanceRequest::find().order_by_desc(maintenance_request::Column::CreatedAt);
        if let Some(ids) = unit_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(maintenance_request::Column::UnitId.is_in(ids.iter().copied()));
        }
        if let Some(status) = status {
            query = query.filter(maintenance_request::Column::Status.eq(status));
        }

        query
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn update_status(
        &self,
        request: MaintenanceRequestModel,
        status: MaintenanceStatus,
    ) -> Result<MaintenanceRequestModel, RepositoryError> {
        let mut active_request = request.into_active_model();
        active_request.status = Set(status);
        active_request.updated_at = Set(Utc::now().into());

        active_request
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
