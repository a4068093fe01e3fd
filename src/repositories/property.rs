//! # Property Repository
//!
//! Properties are owned by a landlord and contain units.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use super::AccessScope;
use crate::error::RepositoryError;
use crate::models::property::{
    self, ActiveModel as PropertyActiveModel, Entity as Property, Model as PropertyModel,
};
use crate::models::unit;

/// Request data for creating a property
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub name: String,
    pub address: String,
    pub owner_id: Uuid,
}

/// Repository for Property database operations
pub struct PropertyRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PropertyRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create_property(
        &self,
        request: NewProperty,
    ) -> Result<PropertyModel, RepositoryError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(RepositoryError::validation_error(
                "name",
                "Property name cannot be empty",
            ));
        }
        let address = request.address.trim();
        if address.is_empty() {
            return Err(RepositoryError::validation_error(
                "address",
                "Property address cannot be empty",
            ));
        }

        let now = Utc::now();
        let property = PropertyActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            address: Set(address.to_string()),
            owner_id: Set(request.owner_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        property
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Fetch a property if it exists and the scope can see it.
    pub async fn get_property(
        &self,
        id: Uuid,
        scope: AccessScope,
    ) -> Result<Option<PropertyModel>, RepositoryError> {
        let query = Property::find_by_id(id);
        let query = match scope {
            AccessScope::All => query,
            AccessScope::Owner(owner_id) => query.filter(property::Column::OwnerId.eq(owner_id)),
            AccessScope::Tenant(tenant_id) => query
                .join(JoinType::InnerJoin, property::Relation::Unit.def())
                .filter(unit::Column::TenantId.eq(tenant_id)),
        };

        query
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn list_properties(
        &self,
        scope: AccessScope,
    ) -> Result<Vec<PropertyModel>, RepositoryError> {
        let query = Property::find().order_by_asc(property::Column::Name);
        let query = match scope {
            AccessScope::All => query,
            AccessScope::Owner(owner_id) => query.filter(property::Column::OwnerId.eq(owner_id)),
            AccessScope::Tenant(tenant_id) => query
                .join(JoinType::InnerJoin, property::Relation::Unit.def())
                .filter(unit::Column::TenantId.eq(tenant_id))
                .distinct(),
        };

        query
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Delete a property that has no units left.
    pub async fn delete_property(&self, property: PropertyModel) -> Result<(), RepositoryError> {
        let units = property
            .find_related(unit::Entity)
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)?;
        if units > 0 {
            return Err(RepositoryError::conflict(format!(
                "Property still has {units} unit(s)"
            )));
        }

        property
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }
}
