//! Reset to the seed state.
//!
//! Benchmark runs add rows above fixed id thresholds; deleting everything
//! above them restores the baseline. The process cache is left alone, so
//! entries read before the reset can outlive the rows they came from.

use sqlx::PgPool;

use crate::db::{
    CommentRepository, HistoryRepository, ProductRepository, RepositoryError, UserRepository,
};

/// Rows removed by [`reset_to_seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetSummary {
    pub users: u64,
    pub products: u64,
    pub comments: u64,
    pub histories: u64,
}

/// Delete every row created after the seed set.
///
/// The deletes run one after another, outside a transaction.
///
/// # Errors
///
/// Returns `RepositoryError` if any delete fails; earlier deletes stay applied.
pub async fn reset_to_seed(pool: &PgPool) -> Result<ResetSummary, RepositoryError> {
    let users = UserRepository::new(pool).delete_beyond_seed().await?;
    let products = ProductRepository::new(pool).delete_beyond_seed().await?;
    let comments = CommentRepository::new(pool).delete_beyond_seed().await?;
    let histories = HistoryRepository::new(pool).delete_beyond_seed().await?;

    let summary = ResetSummary {
        users,
        products,
        comments,
        histories,
    };
    tracing::info!(?summary, "reset to seed state");
    Ok(summary)
}
