//! Checkout: turning a session cart into a persisted order.
//!
//! The order header and every item are written in one transaction. Product
//! prices are read inside that same transaction, so the stored total always
//! equals the sum of the stored items.

use sqlx::SqlitePool;
use thiserror::Error;

use smart_gadgets_core::{Price, ProductId, UserId};

use super::cart::{self, CartError, PricedCart};
use crate::db::RepositoryError;
use crate::db::orders::{self, NewOrderItem};
use crate::db::products;
use crate::models::{Cart, Order, OrderItem};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// Some cart entries refer to products that no longer exist.
    #[error("products no longer available: {0:?}")]
    ProductsUnavailable(Vec<ProductId>),

    /// The order total does not fit in a `Price`.
    #[error("order total is too large")]
    TotalOverflow,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<CartError> for CheckoutError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Repository(e) => Self::Repository(e),
            CartError::TotalOverflow => Self::TotalOverflow,
        }
    }
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// A freshly written order with its items.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Price the cart for the confirmation page. Writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no entries.
    /// Returns `CheckoutError::Repository` if a lookup fails.
    pub async fn preview(&self, cart: &Cart) -> Result<PricedCart, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(cart::price_cart(self.pool, cart).await?)
    }

    /// Place an order for the cart at current catalog prices.
    ///
    /// Either the order and all of its items are committed, or nothing is.
    /// The caller clears the session cart on success.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no entries.
    /// Returns `CheckoutError::ProductsUnavailable` if any product was deleted.
    /// Returns `CheckoutError::TotalOverflow` if the total does not fit.
    /// Returns `CheckoutError::Repository` if the database fails.
    pub async fn submit(
        &self,
        cart: &Cart,
        user_id: Option<UserId>,
    ) -> Result<PlacedOrder, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut tx = self.pool.begin().await?;

        let mut pending = Vec::with_capacity(cart.len());
        let mut missing = Vec::new();
        for (product_id, quantity) in cart.lines() {
            match products::find_in(&mut tx, product_id).await? {
                Some(product) => pending.push(NewOrderItem {
                    product_id: product.id,
                    product_name: product.name,
                    quantity,
                    price: product.price,
                }),
                None => missing.push(product_id),
            }
        }

        if !missing.is_empty() {
            tx.rollback().await?;
            tracing::warn!(?missing, "Checkout aborted: products no longer available");
            return Err(CheckoutError::ProductsUnavailable(missing));
        }

        let total = order_total(&pending)?;
        let order = orders::insert_order(&mut tx, user_id, total).await?;

        let mut items = Vec::with_capacity(pending.len());
        for item in &pending {
            items.push(orders::insert_item(&mut tx, order.id, item).await?);
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            total_cents = order.total.cents(),
            items = items.len(),
            guest = user_id.is_none(),
            "Order placed"
        );

        Ok(PlacedOrder { order, items })
    }
}

/// Sum of `price * quantity` with overflow checks.
fn order_total(items: &[NewOrderItem]) -> Result<Price, CheckoutError> {
    items.iter().try_fold(Price::ZERO, |total, item| {
        cart::line_subtotal(item.price, item.quantity)
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or(CheckoutError::TotalOverflow)
    })
}
