//! Bakugai Core - Shared types library.
//!
//! This crate provides common types used across all Bakugai components:
//! - `storefront` - The web application (listing, product pages, purchases)
//! - `cli` - Command-line tools for migrations, seeding and resets
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices, lenient parameter parsing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
