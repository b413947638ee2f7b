//! Product domain types.

use chrono::{DateTime, Utc};

use bakugai_core::{Price, ProductId};

use super::ProductComment;

/// Number of description characters shown in listings.
pub const DESCRIPTION_PREVIEW_CHARS: i32 = 70;

/// A full product record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image_path: String,
    pub price: Price,
}

/// A product as shown in listings: the description is cut to
/// [`DESCRIPTION_PREVIEW_CHARS`] characters by the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image_path: String,
    pub price: Price,
}

/// A listed product with its comment count and most recent comments.
#[derive(Debug, Clone)]
pub struct ListedProduct {
    pub product: ProductSummary,
    pub comment_count: usize,
    pub comments: Vec<ProductComment>,
}

/// One row of a user's purchase history.
#[derive(Debug, Clone)]
pub struct PurchasedProduct {
    pub product: ProductSummary,
    pub purchased_at: DateTime<Utc>,
}
