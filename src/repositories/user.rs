//! # User Repository
//!
//! Account storage used by the auth service and the admin user listing.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::Role;
use crate::models::user::{self, ActiveModel as UserActiveModel, Entity as User, Model as UserModel};

/// Data for inserting a new account. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
}

/// Repository for User database operations
pub struct UserRepository<'a, C = DatabaseConnection> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Insert a user. A duplicate email surfaces as a unique-violation database error.
    pub async fn create_user(&self, new_user: NewUser) -> Result<UserModel, RepositoryError> {
        if new_user.name.trim().is_empty() {
            return Err(RepositoryError::validation_error(
                "name",
                "Name cannot be empty",
            ));
        }

        let now = Utc::now();
        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password: Set(new_user.password_hash),
            name: Set(new_user.name.trim().to_string()),
            role: Set(new_user.role),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        user.insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, RepositoryError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserModel>, RepositoryError> {
        User::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// List users ordered by email, optionally restricted to one role.
    pub async fn list_users(&self, role: Option<Role>) -> Result<Vec<UserModel>, RepositoryError> {
        let mut query = User::find().order_by_asc(user::Column::Email);
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role));
        }

        query
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn count_users(&self) -> Result<u64, RepositoryError> {
        User::find()
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
