//! CLI subcommands.

pub mod initialize;
pub mod migrate;
pub mod seed;

use bakugai_storefront::config::{ConfigError, DatabaseConfig};
use bakugai_storefront::db;
use sqlx::PgPool;

/// Connect using the storefront's `BAKUGAI_DB_*` settings.
async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let config = DatabaseConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        database = %config.name,
        "Connecting to storefront database..."
    );
    Ok(db::create_pool(&config).await?)
}

/// Errors shared by the database commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] bakugai_storefront::db::RepositoryError),

    #[error("Invalid seed plan: {0}")]
    InvalidPlan(String),
}
