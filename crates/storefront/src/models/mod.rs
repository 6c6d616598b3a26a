//! Domain models for the store.
//!
//! Validated domain objects, separate from database row types.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::Cart;
pub use order::{Order, OrderItem};
pub use product::{NewProduct, Product};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
