//! Order domain types.
//!
//! Orders and their items are immutable once written.

use chrono::{DateTime, Utc};

use smart_gadgets_core::{OrderId, OrderItemId, Price, ProductId, UserId};

/// A completed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    /// Sum of `price * quantity` over the order's items.
    pub total: Price,
    /// Owner; `None` for guest checkouts.
    pub user_id: Option<UserId>,
}

/// A frozen line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    /// `None` once the product has been deleted from the catalog.
    pub product_id: Option<ProductId>,
    /// Product name at purchase time.
    pub product_name: String,
    pub quantity: u32,
    /// Unit price at purchase time.
    pub price: Price,
}

impl OrderItem {
    /// Captured unit price times quantity.
    ///
    /// Overflow was ruled out when the order was written.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price
            .checked_mul(self.quantity)
            .unwrap_or(Price::ZERO)
    }
}
