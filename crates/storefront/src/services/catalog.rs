//! Product listing and product detail.
//!
//! The listing paginates by id, not by row count: page `n` covers ids
//! `n*50+1 ..= n*50+50`. Gaps in the id space give shorter pages.

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;

use bakugai_core::{ProductId, lenient_i32};

use crate::cache::StoreCache;
use crate::db::{CommentRepository, ProductRepository, RepositoryError};
use crate::models::{ListedProduct, Product, ProductComment, ProductSummary};

/// Products per listing page.
pub const PAGE_SIZE: i32 = 50;

/// Recent comments shown under each listed product.
pub const COMMENTS_PER_PRODUCT: usize = 5;

/// Highest page whose id range still fits in an `i32`.
const MAX_PAGE: i32 = i32::MAX / PAGE_SIZE - 1;

/// A listing page number, normalized to be non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingPage(i32);

impl ListingPage {
    /// Read the `page` query value leniently.
    ///
    /// Absent, empty, non-numeric and negative values are page 0.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        Self(raw.map_or(0, lenient_i32).clamp(0, MAX_PAGE))
    }

    /// The page number.
    #[must_use]
    pub const fn number(self) -> i32 {
        self.0
    }

    /// Offset of the page in the id space; also its cache key.
    #[must_use]
    pub const fn offset(self) -> i32 {
        self.0 * PAGE_SIZE
    }

    /// Smallest product id on the page.
    #[must_use]
    pub const fn first_id(self) -> ProductId {
        ProductId::new(self.offset() + 1)
    }

    /// Largest product id on the page.
    #[must_use]
    pub const fn last_id(self) -> ProductId {
        ProductId::new(self.offset() + PAGE_SIZE)
    }
}

/// Attach comment counts and the most recent comments to each product.
///
/// `comments` must already be ordered newest first; the order is kept.
#[must_use]
pub fn attach_comments(
    products: &[ProductSummary],
    comments: Vec<ProductComment>,
) -> Vec<ListedProduct> {
    let mut by_product: HashMap<ProductId, Vec<ProductComment>> = HashMap::new();
    for comment in comments {
        by_product.entry(comment.product_id).or_default().push(comment);
    }

    products
        .iter()
        .map(|product| {
            let mut comments = by_product.remove(&product.id).unwrap_or_default();
            let comment_count = comments.len();
            comments.truncate(COMMENTS_PER_PRODUCT);
            ListedProduct {
                product: product.clone(),
                comment_count,
                comments,
            }
        })
        .collect()
}

/// Catalog reads, backed by the process cache.
pub struct CatalogService<'a> {
    pool: &'a PgPool,
    cache: &'a StoreCache,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cache: &'a StoreCache) -> Self {
        Self { pool, cache }
    }

    /// Products on `page`, newest id first, each with its comments.
    ///
    /// The product rows are cached per page; comments are always read fresh.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails.
    pub async fn listing(&self, page: ListingPage) -> Result<Vec<ListedProduct>, RepositoryError> {
        let products = ProductRepository::new(self.pool);
        let summaries = self
            .cache
            .products_at_offset(
                page.offset(),
                products.list_by_id_range(page.first_id(), page.last_id()),
            )
            .await?;

        let ids: Vec<ProductId> = summaries.iter().map(|p| p.id).collect();
        let comments = CommentRepository::new(self.pool)
            .list_for_products(&ids)
            .await?;

        Ok(attach_comments(&summaries, comments))
    }

    /// A single product, or `None` when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn product(&self, id: ProductId) -> Result<Option<Arc<Product>>, RepositoryError> {
        let products = ProductRepository::new(self.pool);
        self.cache.product(id, products.get_by_id(id)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};

    use bakugai_core::Price;

    use super::*;

    fn summary(id: i32) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            name: format!("product {id}"),
            description: "desc".to_string(),
            image_path: "/images/image0.jpg".to_string(),
            price: Price::new(1_000),
        }
    }

    fn comment(product_id: i32, minute: u32) -> ProductComment {
        ProductComment {
            product_id: ProductId::new(product_id),
            user_name: "taro".to_string(),
            content: format!("comment at {minute}"),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_absent_page_is_zero() {
        assert_eq!(ListingPage::from_param(None), ListingPage::from_param(Some("0")));
        assert_eq!(ListingPage::from_param(None).number(), 0);
    }

    #[test]
    fn test_lenient_page_values() {
        assert_eq!(ListingPage::from_param(Some("abc")).number(), 0);
        assert_eq!(ListingPage::from_param(Some("")).number(), 0);
        assert_eq!(ListingPage::from_param(Some("-4")).number(), 0);
        assert_eq!(ListingPage::from_param(Some("3x")).number(), 3);
    }

    #[test]
    fn test_page_id_range() {
        let first = ListingPage::from_param(Some("0"));
        assert_eq!(first.offset(), 0);
        assert_eq!(first.first_id(), ProductId::new(1));
        assert_eq!(first.last_id(), ProductId::new(50));

        let second = ListingPage::from_param(Some("1"));
        assert_eq!(second.offset(), 50);
        assert_eq!(second.first_id(), ProductId::new(51));
        assert_eq!(second.last_id(), ProductId::new(100));
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let page = ListingPage::from_param(Some("99999999999"));
        assert!(page.last_id().as_i32() > page.first_id().as_i32());
    }

    #[test]
    fn test_attach_comments_groups_and_limits() {
        let products = vec![summary(2), summary(1)];
        let comments: Vec<ProductComment> = (0..7)
            .rev()
            .map(|minute| comment(1, minute))
            .chain(std::iter::once(comment(2, 30)))
            .collect();

        let listed = attach_comments(&products, comments);

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].product.id, ProductId::new(2));
        assert_eq!(listed[0].comment_count, 1);
        assert_eq!(listed[0].comments.len(), 1);

        assert_eq!(listed[1].product.id, ProductId::new(1));
        assert_eq!(listed[1].comment_count, 7);
        assert_eq!(listed[1].comments.len(), COMMENTS_PER_PRODUCT);
        assert_eq!(listed[1].comments[0].content, "comment at 6");
        assert_eq!(listed[1].comments[4].content, "comment at 2");
    }

    #[test]
    fn test_products_without_comments_have_zero_count() {
        let listed = attach_comments(&[summary(5)], Vec::new());
        assert_eq!(listed[0].comment_count, 0);
        assert!(listed[0].comments.is_empty());
    }

    #[test]
    fn test_empty_listing() {
        assert!(attach_comments(&[], vec![comment(1, 0)]).is_empty());
    }
}
