//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with `request_id` and `user_id` fields)
//! 3. Request ID (propagate or generate `x-request-id`)
//!
//! Sessions are not a layer: handlers read the signed cookie through the
//! [`OptionalAuth`] and [`RequireAuth`] extractors.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, clear_current_user, current_user, set_current_user};
