//! # Bandstand Main Entry Point

use bandstand::migration::{Migrator, MigratorTrait};
use bandstand::{config::ConfigLoader, db, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from layered env files and variables.
    let config = ConfigLoader::new().load()?;

    logging::init_tracing(&config)?;
    tracing::info!(profile = %config.profile, "loaded configuration");
    if let Ok(redacted) = config.redacted_json() {
        tracing::debug!(config = %redacted, "effective configuration");
    }

    // Connect and bring the schema up to date before serving.
    let pool = db::init_pool(&config).await?;
    Migrator::up(&pool, None).await?;

    server::run_server(config, pool).await
}
