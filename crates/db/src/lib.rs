//! Data access layer: connection pool, entity models, and repositories.

pub mod config;
pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use config::DatabaseConfig;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL with default pool settings.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    create_pool_with(&DatabaseConfig::with_url(database_url)).await
}

/// Create a connection pool from a full [`DatabaseConfig`].
pub async fn create_pool_with(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await?;
    tracing::debug!(
        max_connections = config.max_connections,
        "Database connection pool created"
    );
    Ok(pool)
}

/// Verify the database is reachable by running a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
