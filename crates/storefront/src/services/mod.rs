//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Email/password login
//! - `catalog` - Product listing and product detail (cached)
//! - `purchases` - Buying, purchase history and the "already bought" check
//! - `comments` - Posting product comments
//! - `maintenance` - Reset to the seed state between benchmark runs

pub mod auth;
pub mod catalog;
pub mod comments;
pub mod maintenance;
pub mod purchases;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogService, ListingPage};
pub use comments::CommentService;
pub use maintenance::{ResetSummary, reset_to_seed};
pub use purchases::{PurchaseService, UserPage};
