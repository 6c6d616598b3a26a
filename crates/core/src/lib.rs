//! Smart Gadgets Core - Shared types library.
//!
//! This crate provides common types used across the Smart Gadgets components:
//! - `storefront` - Catalog, cart, checkout and admin web application
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. The optional `sqlite` feature adds `sqlx` encode/decode
//! support for the ID newtypes.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
