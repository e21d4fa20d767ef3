//! # Platform API Main Entry Point
//!
//! This is the main entry point for the Platform API service.

use platform_api::migration::{Migrator, MigratorTrait};
use platform_api::{config::ConfigLoader, db, seeds, server::run_server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from layered env files and variables
    let config = ConfigLoader::new().load()?;

    telemetry::init_tracing(&config)?;
    tracing::info!(profile = %config.profile, "loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "effective configuration");
    }

    let db = db::init_pool(&config).await?;
    Migrator::up(&db, None).await?;

    seeds::seed_default_admin(&db, &config).await?;

    run_server(config, db).await
}
