//! Screen entity model
//!
//! Screens are the tenant-owned content entries served by the platform,
//! addressed by a normalized path unique within each tenant.

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::tenant::{TenantContext, TenantOwned};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "screens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning tenant; stamped at creation and immutable afterwards
    pub tenant_id: Uuid,

    /// Normalized path, unique per tenant
    pub path: String,

    pub screen_type: ScreenType,

    pub status: ScreenStatus,

    /// Screen payload as JSON (ignored for redirects)
    pub content: Json,

    /// Target URL, only for `REDIRECT` screens
    pub redirect_target_url: Option<String>,

    /// Redirect HTTP status, only for `REDIRECT` screens
    pub redirect_status: Option<i32>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

/// What a screen renders as.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreenType {
    #[sea_orm(string_value = "MARKDOWN")]
    Markdown,
    #[sea_orm(string_value = "HTML")]
    Html,
    #[sea_orm(string_value = "REDIRECT")]
    Redirect,
}

/// Publication state of a screen.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreenStatus {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "PUBLISHED")]
    Published,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl TenantOwned for Entity {
    fn tenant_column() -> Column {
        Column::TenantId
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Stamp the bound tenant on insert and refuse tenant reassignment on
    /// update. Persisting a screen without an active tenant context is an
    /// error, not a default.
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            let bound = TenantContext::current().map_err(|err| DbErr::Custom(err.to_string()))?;
            if let ActiveValue::Set(existing) = &self.tenant_id
                && *existing != bound.as_uuid()
            {
                return Err(DbErr::Custom(
                    "screen tenant_id does not match the bound tenant context".to_string(),
                ));
            }
            self.tenant_id = Set(bound.as_uuid());
        } else if matches!(self.tenant_id, ActiveValue::Set(_)) {
            return Err(DbErr::Custom(
                "screen tenant_id is immutable after creation".to_string(),
            ));
        }

        Ok(self)
    }
}
