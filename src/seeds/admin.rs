//! Seeds a default admin user for the `default` tenant on `local`/`dev`
//! profiles only. Idempotent: if the user already exists for the tenant, it
//! does nothing.
//!
//! Runs inside its own tenant context scope so the entity stamping guardrail
//! applies to seeded rows exactly as it does to request-created ones.

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::repositories::user::CreateUserRequest;
use crate::repositories::{TenantRepository, UserRepository};
use crate::tenant::resolver::DEFAULT_TENANT_SLUG;
use crate::tenant::{TenantContext, TenantId, TenantScope};

pub async fn seed_default_admin(db: &DatabaseConnection, config: &AppConfig) -> anyhow::Result<()> {
    if !config.dev_mode() {
        return Ok(());
    }

    let tenants = TenantRepository::new(db);
    let Some(default_tenant) = tenants.find_by_slug(DEFAULT_TENANT_SLUG).await? else {
        tracing::info!("default tenant not found; skipping admin seed");
        return Ok(());
    };
    let tenant_id = TenantId(default_tenant.id);

    TenantContext::scope(async move {
        TenantContext::bind(tenant_id)?;
        let scope = TenantScope::attach()?;
        let users = UserRepository::new(db, &scope);

        if users
            .find_by_username(&config.seed_admin.username)
            .await?
            .is_some()
        {
            tracing::info!(
                username = %config.seed_admin.username,
                "admin user already exists for default tenant; skipping"
            );
            return Ok(());
        }

        let password_hash = bcrypt::hash(&config.seed_admin.password, bcrypt::DEFAULT_COST)?;

        users
            .create(CreateUserRequest {
                username: config.seed_admin.username.clone(),
                password_hash,
                roles: config.seed_admin.roles.clone(),
            })
            .await?;

        tracing::warn!(
            username = %config.seed_admin.username,
            "created admin user for default tenant with a DEVELOPMENT password; change it in local env"
        );

        Ok(())
    })
    .await
}
