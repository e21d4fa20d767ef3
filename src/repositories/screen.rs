//! # Screen Repository
//!
//! Tenant-scoped CRUD for screens. All reads go through the request's
//! [`TenantScope`]; inserts are stamped with the bound tenant by the entity's
//! `ActiveModelBehavior`; the tenant column is never touched on update.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, IntoActiveModel, ModelTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::screen::{
    ActiveModel as ScreenActiveModel, Column as ScreenColumn, Model as ScreenModel, ScreenStatus,
    ScreenType,
};
use crate::tenant::TenantScope;

/// Request data for creating a new screen
#[derive(Debug, Clone)]
pub struct CreateScreenRequest {
    /// Normalized path (callers normalize and validate before reaching here)
    pub path: String,
    pub screen_type: ScreenType,
    pub status: ScreenStatus,
    pub content: serde_json::Value,
    pub redirect_target_url: Option<String>,
    pub redirect_status: Option<i32>,
}

/// Mutable fields for updating a screen; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateScreenRequest {
    pub path: Option<String>,
    pub screen_type: Option<ScreenType>,
    pub status: Option<ScreenStatus>,
    pub content: Option<serde_json::Value>,
    pub redirect_target_url: Option<String>,
    pub redirect_status: Option<i32>,
}

/// Repository for Screen database operations, pinned to one tenant
pub struct ScreenRepository<'a> {
    db: &'a DatabaseConnection,
    scope: &'a TenantScope,
}

impl<'a> ScreenRepository<'a> {
    /// Create a new ScreenRepository for the given session scope
    pub fn new(db: &'a DatabaseConnection, scope: &'a TenantScope) -> Self {
        Self { db, scope }
    }

    /// List all screens of this tenant, ordered by path
    pub async fn list(&self) -> Result<Vec<ScreenModel>, RepositoryError> {
        let screens = self
            .scope
            .select::<crate::models::Screen>()?
            .order_by_asc(ScreenColumn::Path)
            .all(self.db)
            .await?;

        Ok(screens)
    }

    /// Find a screen of this tenant by primary key
    pub async fn find_by_id(&self, screen_id: Uuid) -> Result<Option<ScreenModel>, RepositoryError> {
        let screen = self
            .scope
            .select::<crate::models::Screen>()?
            .filter(ScreenColumn::Id.eq(screen_id))
            .one(self.db)
            .await?;

        Ok(screen)
    }

    /// Find a screen of this tenant by normalized path and status
    pub async fn find_by_path_and_status(
        &self,
        path: &str,
        status: ScreenStatus,
    ) -> Result<Option<ScreenModel>, RepositoryError> {
        let screen = self
            .scope
            .select::<crate::models::Screen>()?
            .filter(ScreenColumn::Path.eq(path))
            .filter(ScreenColumn::Status.eq(status))
            .one(self.db)
            .await?;

        Ok(screen)
    }

    /// Create a new screen for this tenant. The tenant stamp comes from the
    /// bound context, not from the caller.
    pub async fn create(&self, request: CreateScreenRequest) -> Result<ScreenModel, RepositoryError> {
        self.scope.guard()?;
        let now = Utc::now();

        let screen = ScreenActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: NotSet,
            path: Set(request.path),
            screen_type: Set(request.screen_type),
            status: Set(request.status),
            content: Set(request.content),
            redirect_target_url: Set(request.redirect_target_url),
            redirect_status: Set(request.redirect_status),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let result = screen.insert(self.db).await?;

        Ok(result)
    }

    /// Update mutable fields of a screen of this tenant. The tenant column is
    /// immutable and never written here.
    pub async fn update(
        &self,
        screen_id: Uuid,
        request: UpdateScreenRequest,
    ) -> Result<ScreenModel, RepositoryError> {
        let screen = self
            .find_by_id(screen_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Screen not found".to_string()))?;

        let mut active = screen.into_active_model();
        if let Some(path) = request.path {
            active.path = Set(path);
        }
        if let Some(screen_type) = request.screen_type {
            active.screen_type = Set(screen_type);
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if let Some(content) = request.content {
            active.content = Set(content);
        }
        if let Some(url) = request.redirect_target_url {
            active.redirect_target_url = Set(Some(url));
        }
        if let Some(redirect_status) = request.redirect_status {
            active.redirect_status = Set(Some(redirect_status));
        }
        active.updated_at = Set(Utc::now().into());

        let result = active.update(self.db).await?;

        Ok(result)
    }

    /// Delete a screen of this tenant
    pub async fn delete(&self, screen_id: Uuid) -> Result<(), RepositoryError> {
        let screen = self
            .find_by_id(screen_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Screen not found".to_string()))?;

        screen.delete(self.db).await?;

        Ok(())
    }
}
