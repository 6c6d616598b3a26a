//! Product domain types.

use smart_gadgets_core::{Price, ProductId};

/// Image reference used when a product has no uploaded picture.
///
/// The placeholder ships with the static assets, not the upload directory.
pub const NO_IMAGE: &str = "noimage.svg";

/// Longest accepted product name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    /// Units on hand. Informational only; checkout does not decrement it.
    pub stock: u32,
    /// File name under the upload directory, or [`NO_IMAGE`].
    pub image: String,
}

impl Product {
    /// URL the product picture is served from.
    #[must_use]
    pub fn image_url(&self) -> String {
        if self.image == NO_IMAGE {
            format!("/static/images/{NO_IMAGE}")
        } else {
            format!("/uploads/{}", self.image)
        }
    }
}

/// Fields for creating or editing a product.
///
/// `image` is `None` when no file was uploaded: creation falls back to
/// [`NO_IMAGE`] and editing keeps the current picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    pub stock: u32,
    pub image: Option<String>,
}

/// Check a product name against the catalog's limits.
///
/// # Errors
///
/// Returns a message describing why the name was rejected.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("cannot be empty".to_owned());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!("must be at most {MAX_NAME_LENGTH} characters"));
    }
    Ok(())
}
