pub mod image_process;
pub mod memory;

use sqlx::migrate::Migrator;
use sqlx::PgPool;

/// Embedded schema migrations from the workspace `migrations/` directory
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply any pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
