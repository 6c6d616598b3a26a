//! Seed the catalog from a YAML file.
//!
//! The file is a list of products:
//!
//! ```yaml
//! - name: Smart Phone
//!   price: "199.99"
//!   description: A phone that is smart.
//!   category: phones
//!   stock: 25
//!   image: phone.png   # optional, defaults to noimage.svg
//! ```
//!
//! Every entry is validated before anything is written, and the inserts
//! share one transaction so a failed row leaves the catalog untouched.

use std::path::Path;

use serde::Deserialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{error, info};

use smart_gadgets_core::Price;
use smart_gadgets_storefront::db::{RepositoryError, products};
use smart_gadgets_storefront::models::NewProduct;
use smart_gadgets_storefront::models::product::validate_name;

/// Errors from loading a catalog file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read {0}: {1}")]
    Read(String, std::io::Error),

    #[error("invalid catalog file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} invalid catalog entries")]
    Invalid(usize),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One product as written in the catalog file.
#[derive(Debug, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    pub image: Option<String>,
}

impl From<CatalogEntry> for NewProduct {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            name: entry.name,
            price: entry.price,
            description: entry.description,
            category: entry.category,
            stock: entry.stock,
            image: entry.image,
        }
    }
}

/// Parse catalog YAML and check each entry.
///
/// # Errors
///
/// Returns `SeedError::Parse` for malformed YAML (including bad prices) and
/// `SeedError::Invalid` if any entry has an empty or overlong name.
pub fn parse_catalog(content: &str) -> Result<Vec<CatalogEntry>, SeedError> {
    let entries: Vec<CatalogEntry> = serde_yaml::from_str(content)?;

    let invalid: Vec<(usize, String)> = entries
        .iter()
        .enumerate()
        .filter_map(|(i, e)| validate_name(&e.name).err().map(|reason| (i, reason)))
        .collect();

    if !invalid.is_empty() {
        for (index, reason) in &invalid {
            error!("  - entry {index}: name {reason}");
        }
        return Err(SeedError::Invalid(invalid.len()));
    }

    Ok(entries)
}

/// Insert every product from `file`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or an insert fails.
pub async fn catalog(pool: &SqlitePool, file: &Path) -> Result<(), SeedError> {
    info!(path = %file.display(), "Loading catalog from file");

    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| SeedError::Read(file.display().to_string(), e))?;
    let entries = parse_catalog(&content)?;

    info!(products = entries.len(), "Parsed catalog");

    let entries: Vec<NewProduct> = entries.into_iter().map(NewProduct::from).collect();
    insert_all(pool, &entries).await?;

    info!("Seeding complete!");
    Ok(())
}

/// Insert `entries` in a single transaction.
///
/// # Errors
///
/// Returns `SeedError::Repository` if any insert fails; nothing is kept.
pub async fn insert_all(pool: &SqlitePool, entries: &[NewProduct]) -> Result<(), SeedError> {
    let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

    for entry in entries {
        let product = products::insert_in(&mut tx, entry).await?;
        info!("  + #{} {} ({})", product.id, product.name, product.price);
    }

    tx.commit().await.map_err(RepositoryError::from)?;
    Ok(())
}
