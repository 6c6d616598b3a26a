//! Typed decoding of submitted forms.
//!
//! Login and registration use plain `Form<T>` with serde. The admin product
//! form is `multipart/form-data` (it carries an image), so it is decoded by
//! hand here into a [`ProductForm`].

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use serde::Deserialize;
use thiserror::Error;

use smart_gadgets_core::Price;

use crate::models::NewProduct;
use crate::models::product::validate_name;

/// Errors from decoding a submitted form.
#[derive(Debug, Error)]
pub enum FormError {
    /// A required field was absent.
    #[error("missing field: {0}")]
    Missing(&'static str),

    /// A field was present but malformed.
    #[error("invalid {0}: {1}")]
    Invalid(&'static str, String),

    /// The multipart body itself could not be read.
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

/// Username and password, as posted by the login and register pages.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// An uploaded file as received.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File name as sent by the browser; sanitized before use.
    pub filename: String,
    pub bytes: Bytes,
}

/// The admin add/edit product form.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    pub stock: u32,
    /// `None` when the file input was left empty.
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Read every part of a multipart body and validate the fields.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Multipart` if the body is unreadable, otherwise
    /// the first `Missing` or `Invalid` field.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, FormError> {
        let mut fields = HashMap::new();
        let mut image = None;

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == "image" {
                let filename = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen
                if !filename.is_empty() {
                    image = Some(ImageUpload { filename, bytes });
                }
            } else {
                fields.insert(name, field.text().await?);
            }
        }

        Self::from_fields(&fields, image)
    }

    /// Validate already-collected text fields.
    ///
    /// # Errors
    ///
    /// Returns the first `Missing` or `Invalid` field.
    pub fn from_fields(
        fields: &HashMap<String, String>,
        image: Option<ImageUpload>,
    ) -> Result<Self, FormError> {
        let get = |key: &'static str| {
            fields
                .get(key)
                .map(|v| v.trim().to_owned())
                .ok_or(FormError::Missing(key))
        };

        let name = get("name")?;
        validate_name(&name).map_err(|reason| FormError::Invalid("name", reason))?;

        let price = Price::parse(&get("price")?)
            .map_err(|e| FormError::Invalid("price", e.to_string()))?;

        let stock = get("stock")?.parse::<u32>().map_err(|_| {
            FormError::Invalid("stock", "must be a non-negative whole number".to_owned())
        })?;

        Ok(Self {
            name,
            price,
            description: get("description")?,
            category: get("category")?,
            stock,
            image,
        })
    }

    /// Product fields with the stored image name, if one was saved.
    #[must_use]
    pub fn into_new_product(self, image: Option<String>) -> NewProduct {
        NewProduct {
            name: self.name,
            price: self.price,
            description: self.description,
            category: self.category,
            stock: self.stock,
            image,
        }
    }
}
