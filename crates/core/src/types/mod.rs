//! Core types for Bakugai.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod param;
pub mod price;

pub use id::*;
pub use param::lenient_i32;
pub use price::Price;
