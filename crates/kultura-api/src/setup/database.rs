//! Provenance repository setup

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use kultura_core::Config;
use kultura_db::{
    run_migrations, ImageProcessRepository, InMemoryImageProcessRepository,
    PgImageProcessRepository,
};
use sqlx::postgres::PgPoolOptions;

/// Connect to Postgres and run migrations, or fall back to the in-memory
/// repository when no `DATABASE_URL` is configured (development only).
pub async fn setup_repository(config: &Config) -> Result<Arc<dyn ImageProcessRepository>> {
    let Some(database_url) = config.database_url() else {
        tracing::warn!("DATABASE_URL not set, provenance records are kept in memory only");
        return Ok(Arc::new(InMemoryImageProcessRepository::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(PgImageProcessRepository::new(pool)))
}
