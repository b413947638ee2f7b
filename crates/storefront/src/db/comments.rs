//! Comment repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bakugai_core::{CommentId, ProductId, UserId};

use super::RepositoryError;
use crate::models::ProductComment;

/// Internal row type for a comment joined with its author.
#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    product_id: i32,
    user_name: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for ProductComment {
    fn from(row: CommentRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            user_name: row.user_name,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

/// Repository for comment operations.
pub struct CommentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a comment. Content is taken as-is, empty included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        product_id: ProductId,
        user_id: UserId,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<CommentId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO comments (product_id, user_id, content, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(product_id.as_i32())
        .bind(user_id.as_i32())
        .bind(content)
        .bind(created_at)
        .fetch_one(self.pool)
        .await?;

        Ok(CommentId::new(id))
    }

    /// All comments on any of `product_ids`, newest first, in one query.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_products(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductComment>, RepositoryError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = product_ids.iter().map(ProductId::as_i32).collect();
        let rows = sqlx::query_as::<_, CommentRow>(
            r"
            SELECT c.product_id, u.name AS user_name, c.content, c.created_at
            FROM comments AS c
            INNER JOIN users AS u ON c.user_id = u.id
            WHERE c.product_id = ANY($1)
            ORDER BY c.created_at DESC
            ",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductComment::from).collect())
    }

    /// Delete comments written after the seed set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_beyond_seed(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM comments WHERE id > $1")
            .bind(CommentId::SEED_MAX)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
