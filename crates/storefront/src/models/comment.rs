//! Comment domain types.

use chrono::{DateTime, Utc};

use bakugai_core::ProductId;

/// A comment on a product, joined with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductComment {
    pub product_id: ProductId,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
