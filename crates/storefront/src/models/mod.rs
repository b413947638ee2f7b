//! Domain models for storefront.
//!
//! Row types live next to their queries in [`crate::db`]; these are the
//! validated shapes handlers and templates work with.

pub mod comment;
pub mod product;
pub mod session;
pub mod user;

pub use comment::ProductComment;
pub use product::{ListedProduct, Product, ProductSummary, PurchasedProduct};
pub use session::CurrentUser;
pub use user::User;
