//! User entity model
//!
//! Users are tenant-owned: every row is stamped with the tenant bound to the
//! creating request, and usernames are unique per tenant.

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveValue, Set};

use crate::tenant::{TenantContext, TenantOwned};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning tenant; stamped at creation and immutable afterwards
    pub tenant_id: Uuid,

    pub username: String,

    pub password_hash: String,

    /// Comma-separated roles, e.g. `ROLE_ADMIN,ROLE_EDITOR`
    pub roles: String,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
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
    /// update. Persisting a user without an active tenant context is an
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
                    "user tenant_id does not match the bound tenant context".to_string(),
                ));
            }
            self.tenant_id = Set(bound.as_uuid());
        } else if matches!(self.tenant_id, ActiveValue::Set(_)) {
            return Err(DbErr::Custom(
                "user tenant_id is immutable after creation".to_string(),
            ));
        }

        Ok(self)
    }
}
