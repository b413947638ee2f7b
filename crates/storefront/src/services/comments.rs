//! Posting product comments.

use chrono::Utc;
use sqlx::PgPool;

use bakugai_core::{CommentId, ProductId};

use crate::db::{CommentRepository, RepositoryError};
use crate::models::CurrentUser;

/// Comment operations.
pub struct CommentService<'a> {
    comments: CommentRepository<'a>,
}

impl<'a> CommentService<'a> {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            comments: CommentRepository::new(pool),
        }
    }

    /// Store `content` as `author`'s comment on `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    pub async fn post(
        &self,
        product_id: ProductId,
        author: &CurrentUser,
        content: &str,
    ) -> Result<CommentId, RepositoryError> {
        self.comments
            .create(product_id, author.id, content, Utc::now())
            .await
    }
}
