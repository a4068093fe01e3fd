//! # Unit Repository
//!
//! Units belong to a property and may be assigned to one tenant. Visibility
//! of leases, maintenance requests and payments is derived from the units a
//! caller can see.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::AccessScope;
use crate::error::RepositoryError;
use crate::models::unit::{self, ActiveModel as UnitActiveModel, Entity as Unit, Model as UnitModel};
use crate::models::{Role, property, user};

/// Request data for creating a unit
#[derive(Debug, Clone)]
pub struct NewUnit {
    pub property_id: Uuid,
    pub number: String,
    pub rent: f64,
}

/// Repository for Unit database operations
pub struct UnitRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UnitRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Create a unit. Unit numbers are unique within a property.
    pub async fn create_unit(&self, request: NewUnit) -> Result<UnitModel, RepositoryError> {
        let number = request.number.trim();
        if number.is_empty() {
            return Err(RepositoryError::validation_error(
                "number",
                "Unit number cannot be empty",
            ));
        }
        if !request.rent.is_finite() || request.rent < 0.0 {
            return Err(RepositoryError::validation_error(
                "rent",
                "Rent must be a non-negative amount",
            ));
        }

        let now = Utc::now();
        let unit = UnitActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(number.to_string()),
            property_id: Set(request.property_id),
            tenant_id: Set(None),
            rent: Set(request.rent),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        unit.insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Fetch a unit if it exists and the scope can see it.
    pub async fn get_unit(
        &self,
        id: Uuid,
        scope: AccessScope,
    ) -> Result<Option<UnitModel>, RepositoryError> {
        let query = Unit::find_by_id(id);
        let query = match scope {
            AccessScope::All => query,
            AccessScope::Owner(owner_id) => query
                .inner_join(property::Entity)
                .filter(property::Column::OwnerId.eq(owner_id)),
            AccessScope::Tenant(tenant_id) => query.filter(unit::Column::TenantId.eq(tenant_id)),
        };

        query
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn list_units_for_property(
        &self,
        property_id: Uuid,
        scope: AccessScope,
    ) -> Result<Vec<UnitModel>, RepositoryError> {
        let query = Unit::find()
            .filter(unit::Column::PropertyId.eq(property_id))
            .order_by_asc(unit::Column::Number);
        let query = match scope {
            AccessScope::Tenant(tenant_id) => query.filter(unit::Column::TenantId.eq(tenant_id)),
            AccessScope::All | AccessScope::Owner(_) => query,
        };

        query
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// IDs of every unit the scope can see, or `None` when nothing is filtered.
    pub async fn visible_unit_ids(
        &self,
        scope: AccessScope,
    ) -> Result<Option<Vec<Uuid>>, RepositoryError> {
        let query = Unit::find().select_only().column(unit::Column::Id);
        let query = match scope {
            AccessScope::All => return Ok(None),
            AccessScope::Owner(owner_id) => query
                .inner_join(property::Entity)
                .filter(property::Column::OwnerId.eq(owner_id)),
            AccessScope::Tenant(tenant_id) => query.filter(unit::Column::TenantId.eq(tenant_id)),
        };

        let ids = query
            .into_tuple::<Uuid>()
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(Some(ids))
    }

    /// Assign a tenant to the unit, or vacate it with `None`.
    pub async fn assign_tenant(
        &self,
        unit: UnitModel,
        tenant_id: Option<Uuid>,
    ) -> Result<UnitModel, RepositoryError> {
        if let Some(tenant_id) = tenant_id {
            let tenant = user::Entity::find_by_id(tenant_id)
                .one(self.db)
                .await
                .map_err(RepositoryError::database_error)?
                .ok_or_else(|| RepositoryError::not_found("Tenant not found"))?;

            if tenant.role != Role::Tenant {
                return Err(RepositoryError::validation_error(
                    "tenant_id",
                    "Only TENANT accounts can be assigned to a unit",
                ));
            }
        }

        let mut active_unit = unit.into_active_model();
        active_unit.tenant_id = Set(tenant_id);
        active_unit.updated_at = Set(Utc::now().into());

        active_unit
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
