//! # User Repository
//!
//! Tenant-scoped access to user rows. Every query goes through the request's
//! [`TenantScope`], and inserts are stamped with the bound tenant by the
//! entity's `ActiveModelBehavior`.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, NotSet, QueryFilter, Set};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::user::{ActiveModel as UserActiveModel, Column as UserColumn, Model as UserModel};
use crate::tenant::TenantScope;

/// Request data for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub password_hash: String,
    /// Comma-separated roles, e.g. `ROLE_ADMIN,ROLE_EDITOR`
    pub roles: String,
}

/// Repository for User database operations, pinned to one tenant
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
    scope: &'a TenantScope,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository for the given session scope
    pub fn new(db: &'a DatabaseConnection, scope: &'a TenantScope) -> Self {
        Self { db, scope }
    }

    /// Find a user of this tenant by username
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserModel>, RepositoryError> {
        let user = self
            .scope
            .select::<crate::models::User>()?
            .filter(UserColumn::Username.eq(username))
            .one(self.db)
            .await?;

        Ok(user)
    }

    /// Find a user of this tenant by primary key
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserModel>, RepositoryError> {
        let user = self
            .scope
            .select::<crate::models::User>()?
            .filter(UserColumn::Id.eq(user_id))
            .one(self.db)
            .await?;

        Ok(user)
    }

    /// Create a new user for this tenant. The tenant stamp comes from the
    /// bound context, not from the caller.
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserModel, RepositoryError> {
        if request.username.trim().is_empty() {
            return Err(RepositoryError::validation_error(
                "Username cannot be empty",
            ));
        }

        self.scope.guard()?;
        let now = Utc::now();

        let user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: NotSet,
            username: Set(request.username),
            password_hash: Set(request.password_hash),
            roles: Set(request.roles),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let result = user.insert(self.db).await?;

        Ok(result)
    }
}
