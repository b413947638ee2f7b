//! Product repository for database operations.

use sqlx::PgPool;

use bakugai_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::product::DESCRIPTION_PREVIEW_CHARS;
use crate::models::{Product, ProductSummary};

/// Internal row type shared by full and summary product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: String,
    image_path: String,
    price: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            image_path: row.image_path,
            price: Price::from(row.price),
        }
    }
}

impl From<ProductRow> for ProductSummary {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            image_path: row.image_path,
            price: Price::from(row.price),
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products whose id is in `first..=last`, newest id first.
    ///
    /// Descriptions are cut to the listing preview length. Missing ids in the
    /// range simply produce fewer rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_id_range(
        &self,
        first: ProductId,
        last: ProductId,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, LEFT(description, $3) AS description, image_path, price
            FROM products
            WHERE id BETWEEN $1 AND $2
            ORDER BY id DESC
            ",
        )
        .bind(first.as_i32())
        .bind(last.as_i32())
        .bind(DESCRIPTION_PREVIEW_CHARS)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductSummary::from).collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, image_path, price
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Delete products created after the seed set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_beyond_seed(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id > $1")
            .bind(ProductId::SEED_MAX)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
