//! Test utilities for database and router testing.
//!
//! Sets up in-memory SQLite databases with migrations applied and provides
//! fixture helpers for tenants, domain bindings and users.

use anyhow::Result;
use platform_api::config::AppConfig;
use platform_api::migration::{Migrator, MigratorTrait};
use platform_api::server::AppState;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement, Value};
use uuid::Uuid;

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// A test configuration with a JWT secret and the `local` profile.
#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "integration-test-secret".to_string(),
        ..Default::default()
    }
}

/// A test configuration for a non-development profile.
#[allow(dead_code)]
pub fn prod_config() -> AppConfig {
    AppConfig {
        profile: "prod".to_string(),
        ..test_config()
    }
}

/// Application state backed by an in-memory database.
#[allow(dead_code)]
pub fn test_state(config: AppConfig, db: DatabaseConnection) -> AppState {
    AppState::new(config, db)
}

/// Creates a tenant row and returns its id.
pub async fn create_test_tenant(db: &DatabaseConnection, slug: &str) -> Result<Uuid> {
    let id = Uuid::new_v4();

    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        "INSERT INTO tenants (id, slug, name) VALUES (?, ?, ?)",
        [
            Value::from(id),
            Value::from(slug),
            Value::from(format!("{} tenant", slug)),
        ],
    );
    db.execute(stmt).await?;

    Ok(id)
}

/// Creates a domain binding pointing at a tenant.
#[allow(dead_code)]
pub async fn create_domain_binding(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    domain: &str,
) -> Result<()> {
    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        "INSERT INTO tenant_domains (id, tenant_id, domain, is_primary) VALUES (?, ?, ?, ?)",
        [
            Value::from(Uuid::new_v4()),
            Value::from(tenant_id),
            Value::from(domain),
            Value::from(true),
        ],
    );
    db.execute(stmt).await?;

    Ok(())
}

/// Creates a user row for a tenant with a bcrypt-hashed password.
#[allow(dead_code)]
pub async fn create_test_user(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    username: &str,
    password: &str,
    roles: &str,
) -> Result<Uuid> {
    let id = Uuid::new_v4();
    // Low cost keeps the test suite fast.
    let password_hash = bcrypt::hash(password, 4)?;

    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        "INSERT INTO users (id, tenant_id, username, password_hash, roles) VALUES (?, ?, ?, ?, ?)",
        [
            Value::from(id),
            Value::from(tenant_id),
            Value::from(username),
            Value::from(password_hash),
            Value::from(roles),
        ],
    );
    db.execute(stmt).await?;

    Ok(id)
}
