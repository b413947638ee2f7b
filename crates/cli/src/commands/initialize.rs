//! Reset the database to its seeded state.
//!
//! Same deletes as `GET /initialize`, without going through a running
//! storefront. A running storefront keeps whatever it has cached.

use bakugai_storefront::services::reset_to_seed;

use super::{CommandError, connect};

/// Delete every row above the seed id thresholds.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a delete fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    let summary = reset_to_seed(&pool).await?;

    tracing::info!("Reset complete!");
    tracing::info!("  Users removed: {}", summary.users);
    tracing::info!("  Products removed: {}", summary.products);
    tracing::info!("  Comments removed: {}", summary.comments);
    tracing::info!("  Histories removed: {}", summary.histories);
    Ok(())
}
