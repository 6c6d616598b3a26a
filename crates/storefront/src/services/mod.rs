//! Business logic services for the store.
//!
//! # Services
//!
//! - `auth` - Registration and password login
//! - `cart` - Session cart access and the priced cart view
//! - `checkout` - Turning a cart into a persisted order
//! - `notices` - Flash messages queued in the session
//! - `uploads` - Product image storage

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod notices;
pub mod uploads;
