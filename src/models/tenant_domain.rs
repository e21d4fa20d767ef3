//! Tenant domain binding entity model
//!
//! Maps an exact externally-visible hostname to its owning tenant. A domain
//! belongs to exactly one tenant; a tenant may register several domains.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenant_domains")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// Canonical domain string (unique across all tenants)
    #[sea_orm(unique)]
    pub domain: String,

    /// Whether this is the tenant's primary domain
    pub is_primary: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
