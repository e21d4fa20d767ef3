//! Database migrations for the Platform API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2026_01_01_000001_create_tenants;
mod m2026_01_01_000002_create_tenant_domains;
mod m2026_01_01_000003_create_users;
mod m2026_01_01_000004_create_screens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2026_01_01_000001_create_tenants::Migration),
            Box::new(m2026_01_01_000002_create_tenant_domains::Migration),
            Box::new(m2026_01_01_000003_create_users::Migration),
            Box::new(m2026_01_01_000004_create_screens::Migration),
        ]
    }
}
