//! Host-to-tenant resolution.
//!
//! Ordered lookup strategy over the read-only tenant tables. Explicit domain
//! bindings always win over convention-based slug inference, so a tenant can
//! register a vanity domain later without changing subdomain behavior for
//! anyone else.

use sea_orm::{DatabaseConnection, DbErr};

use crate::config::AppConfig;
use crate::repositories::TenantRepository;
use crate::tenant::TenantId;

/// Slug of the tenant that `localhost` resolves to in development mode.
pub const DEFAULT_TENANT_SLUG: &str = "default";

const LOCALHOST: &str = "localhost";

/// Resolves a canonical host to the owning tenant.
pub struct TenantResolver<'a> {
    tenants: TenantRepository<'a>,
    dev_mode: bool,
}

impl<'a> TenantResolver<'a> {
    pub fn new(db: &'a DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            tenants: TenantRepository::new(db),
            dev_mode: config.dev_mode(),
        }
    }

    /// Resolve `domain` (already canonicalized by
    /// [`normalize_host`](crate::normalize::normalize_host)) to a tenant.
    /// First match wins:
    ///
    /// 1. exact match in `tenant_domains`;
    /// 2. `localhost` in development mode resolves to the `default` tenant;
    /// 3. with at least three labels, the first label is tried as a slug.
    pub async fn resolve(&self, domain: &str) -> Result<Option<TenantId>, DbErr> {
        if let Some(binding) = self.tenants.find_domain_binding(domain).await? {
            return Ok(Some(TenantId(binding.tenant_id)));
        }

        if self.dev_mode && domain == LOCALHOST {
            let default_tenant = self.tenants.find_by_slug(DEFAULT_TENANT_SLUG).await?;
            return Ok(default_tenant.map(|tenant| TenantId(tenant.id)));
        }

        if let Some(slug) = extract_slug(domain)
            && let Some(tenant) = self.tenants.find_by_slug(slug).await?
        {
            return Ok(Some(TenantId(tenant.id)));
        }

        Ok(None)
    }
}

/// Subdomain fallback: `alice.example.com` -> `alice`. Needs at least three
/// labels so bare apex domains never alias a slug.
fn extract_slug(domain: &str) -> Option<&str> {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() >= 3 { Some(labels[0]) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_requires_three_labels() {
        assert_eq!(extract_slug("alice.example.com"), Some("alice"));
        assert_eq!(extract_slug("a.b.c.example.com"), Some("a"));
        assert_eq!(extract_slug("example.com"), None);
        assert_eq!(extract_slug("localhost"), None);
    }
}
