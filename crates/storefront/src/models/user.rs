//! User domain types.

use chrono::{DateTime, Utc};

use smart_gadgets_core::{UserId, Username};

/// A store account (domain type).
///
/// The password hash is deliberately absent; it is only loaded by the
/// credential lookup used at login.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// Whether the account may use the admin panel.
    pub is_admin: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
