//! # Tenant Repository
//!
//! Read-only access to the tenant and tenant-domain tables. Tenants are
//! provisioned out-of-band; nothing in this service writes to these tables,
//! so concurrent readers need no coordination.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::models::tenant::{Column as TenantColumn, Entity as Tenant, Model as TenantModel};
use crate::models::tenant_domain::{
    Column as TenantDomainColumn, Entity as TenantDomain, Model as TenantDomainModel,
};

/// Repository for tenant lookups during resolution
pub struct TenantRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TenantRepository<'a> {
    /// Create a new TenantRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find a tenant by its primary key
    pub async fn find_by_id(&self, tenant_id: Uuid) -> Result<Option<TenantModel>, DbErr> {
        Tenant::find_by_id(tenant_id).one(self.db).await
    }

    /// Find a tenant by its unique slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<TenantModel>, DbErr> {
        Tenant::find()
            .filter(TenantColumn::Slug.eq(slug))
            .one(self.db)
            .await
    }

    /// Find the domain binding for an exact canonical domain
    pub async fn find_domain_binding(
        &self,
        domain: &str,
    ) -> Result<Option<TenantDomainModel>, DbErr> {
        TenantDomain::find()
            .filter(TenantDomainColumn::Domain.eq(domain))
            .one(self.db)
            .await
    }
}
