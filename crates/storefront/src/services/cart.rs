//! Session cart access and pricing.

use sqlx::SqlitePool;
use thiserror::Error;
use tower_sessions::Session;

use smart_gadgets_core::{Price, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::{Cart, Product, session_keys};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// A subtotal or the grand total does not fit in a `Price`.
    #[error("cart total is too large")]
    TotalOverflow,
}

/// One resolved cart entry.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    pub subtotal: Price,
}

/// A cart resolved against the catalog.
#[derive(Debug, Clone)]
pub struct PricedCart {
    /// Lines in product-id order.
    pub lines: Vec<CartLine>,
    /// Sum of the line subtotals.
    pub total: Price,
    /// Cart entries whose product no longer exists.
    pub missing: Vec<ProductId>,
}

impl PricedCart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Load the session's cart, empty if none was stored yet.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn load(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the cart back into the session.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn save(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Add one unit of a product to the session cart, returning the new quantity.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn add_item(
    session: &Session,
    product_id: ProductId,
) -> Result<u32, tower_sessions::session::Error> {
    let mut cart = load(session).await?;
    let quantity = cart.add_item(product_id);
    save(session, &cart).await?;
    Ok(quantity)
}

/// Reset the session cart to empty.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
    save(session, &Cart::new()).await
}

/// Price of `quantity` units, `None` on overflow.
#[must_use]
pub fn line_subtotal(price: Price, quantity: u32) -> Option<Price> {
    price.checked_mul(quantity)
}

/// Resolve every cart entry against the catalog.
///
/// Entries whose product has been deleted are left out of the lines and
/// reported in [`PricedCart::missing`].
///
/// # Errors
///
/// Returns `CartError::Repository` if a lookup fails.
/// Returns `CartError::TotalOverflow` if the total does not fit.
pub async fn price_cart(pool: &SqlitePool, cart: &Cart) -> Result<PricedCart, CartError> {
    let products = ProductRepository::new(pool);
    let mut lines = Vec::with_capacity(cart.len());
    let mut missing = Vec::new();
    let mut total = Price::ZERO;

    for (product_id, quantity) in cart.lines() {
        let Some(product) = products.get_by_id(product_id).await? else {
            missing.push(product_id);
            continue;
        };

        let subtotal = line_subtotal(product.price, quantity).ok_or(CartError::TotalOverflow)?;
        total = total
            .checked_add(subtotal)
            .ok_or(CartError::TotalOverflow)?;

        lines.push(CartLine {
            product,
            quantity,
            subtotal,
        });
    }

    Ok(PricedCart {
        lines,
        total,
        missing,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::db::test_pool;
    use crate::models::NewProduct;

    async fn product(pool: &SqlitePool, name: &str, cents: i64) -> Product {
        ProductRepository::new(pool)
            .create(&NewProduct {
                name: name.to_owned(),
                price: Price::from_cents(cents).unwrap(),
                description: String::new(),
                category: "misc".to_owned(),
                stock: 0,
                image: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_session_cart_accumulates() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let id = ProductId::new(3);

        assert!(load(&session).await.unwrap().is_empty());
        assert_eq!(add_item(&session, id).await.unwrap(), 1);
        assert_eq!(add_item(&session, id).await.unwrap(), 2);
        assert_eq!(load(&session).await.unwrap().quantity_of(id), 2);

        clear(&session).await.unwrap();
        assert!(load(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_price_cart_totals() {
        let pool = test_pool().await;
        let a = product(&pool, "A", 1000).await;
        let b = product(&pool, "B", 500).await;

        let mut cart = Cart::new();
        cart.add_item(a.id);
        cart.add_item(a.id);
        cart.add_item(b.id);

        let priced = price_cart(&pool, &cart).await.unwrap();
        assert_eq!(priced.lines.len(), 2);
        assert_eq!(priced.lines[0].subtotal.cents(), 2000);
        assert_eq!(priced.lines[1].subtotal.cents(), 500);
        assert_eq!(priced.total.cents(), 2500);
        assert!(priced.missing.is_empty());
    }

    #[tokio::test]
    async fn test_price_cart_skips_missing_products() {
        let pool = test_pool().await;
        let a = product(&pool, "A", 1000).await;

        let mut cart = Cart::new();
        cart.add_item(a.id);
        cart.add_item(ProductId::new(999));

        let priced = price_cart(&pool, &cart).await.unwrap();
        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.total.cents(), 1000);
        assert_eq!(priced.missing, vec![ProductId::new(999)]);
    }

    #[tokio::test]
    async fn test_price_cart_overflow() {
        let pool = test_pool().await;
        let pricey = product(&pool, "Pricey", i64::MAX / 2).await;

        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add_item(pricey.id);
        }

        assert!(matches!(
            price_cart(&pool, &cart).await,
            Err(CartError::TotalOverflow)
        ));
    }
}
