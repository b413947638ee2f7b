//! Database operations for the storefront `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Seeded accounts (plain-text passwords)
//! - `products` - Seeded catalog, read-only for the application
//! - `histories` - Purchase records
//! - `comments` - Product comments
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p bakugai-cli -- migrate
//! ```

pub mod comments;
pub mod histories;
pub mod products;
pub mod users;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::DatabaseConfig;

pub use comments::CommentRepository;
pub use histories::HistoryRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors returned by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database (or the cache) has an unexpected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(config)
        .connect_with(config.connect_options())
        .await
}

/// Create a pool that connects on first use.
///
/// Lets the router start (and be tested) without a reachable database.
#[must_use]
pub fn create_lazy_pool(config: &DatabaseConfig) -> PgPool {
    pool_options(config).connect_lazy_with(config.connect_options())
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
}
