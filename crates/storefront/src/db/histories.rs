//! Purchase history repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bakugai_core::{HistoryId, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::product::DESCRIPTION_PREVIEW_CHARS;
use crate::models::{ProductSummary, PurchasedProduct};

/// Internal row type for a history joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct PurchasedRow {
    id: i32,
    name: String,
    description: String,
    image_path: String,
    price: i32,
    created_at: DateTime<Utc>,
}

impl From<PurchasedRow> for PurchasedProduct {
    fn from(row: PurchasedRow) -> Self {
        Self {
            product: ProductSummary {
                id: ProductId::new(row.id),
                name: row.name,
                description: row.description,
                image_path: row.image_path,
                price: Price::from(row.price),
            },
            purchased_at: row.created_at,
        }
    }
}

/// Repository for purchase history operations.
pub struct HistoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HistoryRepository<'a> {
    /// Create a new history repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a purchase.
    ///
    /// Repeat purchases of the same product are separate rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including an
    /// unknown product or user).
    pub async fn create(
        &self,
        product_id: ProductId,
        user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Result<HistoryId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO histories (product_id, user_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(product_id.as_i32())
        .bind(user_id.as_i32())
        .bind(created_at)
        .fetch_one(self.pool)
        .await?;

        Ok(HistoryId::new(id))
    }

    /// The user's most recent purchases, newest first, joined with products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recent_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<PurchasedProduct>, RepositoryError> {
        let rows = sqlx::query_as::<_, PurchasedRow>(
            r"
            SELECT p.id, p.name, LEFT(p.description, $3) AS description,
                   p.image_path, p.price, h.created_at
            FROM histories AS h
            INNER JOIN products AS p ON h.product_id = p.id
            WHERE h.user_id = $1
            ORDER BY h.id DESC
            LIMIT $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(limit)
        .bind(DESCRIPTION_PREVIEW_CHARS)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(PurchasedProduct::from).collect())
    }

    /// Sum of prices over every purchase the user made.
    ///
    /// A user with no purchases totals zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_paid(&self, user_id: UserId) -> Result<Price, RepositoryError> {
        let total = sqlx::query_scalar::<_, Option<i64>>(
            r"
            SELECT SUM(p.price) AS total_pay
            FROM histories AS h
            INNER JOIN products AS p ON h.product_id = p.id
            WHERE h.user_id = $1
            ",
        )
        .bind(user_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(Price::from(total))
    }

    /// Number of times the user bought the product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for(
        &self,
        product_id: ProductId,
        user_id: UserId,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) AS count
            FROM histories
            WHERE product_id = $1 AND user_id = $2
            ",
        )
        .bind(product_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Delete purchases recorded after the seed set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_beyond_seed(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM histories WHERE id > $1")
            .bind(HistoryId::SEED_MAX)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
