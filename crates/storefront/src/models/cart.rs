//! Shopping cart held in the session.
//!
//! The cart is a plain map from product to quantity. It is never written to
//! the database; checkout turns it into an order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use smart_gadgets_core::ProductId;

/// Quantities keyed by product, in product-id order.
///
/// Invariant: every stored quantity is at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<ProductId, u32>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: BTreeMap::new(),
        }
    }

    /// Add one unit of `product_id`, returning the new quantity.
    ///
    /// The product is not checked against the catalog here.
    pub fn add_item(&mut self, product_id: ProductId) -> u32 {
        let quantity = self.lines.entry(product_id).or_insert(0);
        *quantity = quantity.saturating_add(1);
        *quantity
    }

    /// Drop a product from the cart entirely.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        self.lines.remove(&product_id).is_some()
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Quantity of `product_id`, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.lines.get(&product_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .values()
            .fold(0_u32, |acc, qty| acc.saturating_add(*qty))
    }

    /// `(product, quantity)` pairs in product-id order.
    pub fn lines(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.lines.iter().map(|(id, qty)| (*id, *qty))
    }

    /// Product ids in the cart.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.lines.keys().copied().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn id(n: i64) -> ProductId {
        ProductId::new(n)
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.quantity_of(id(1)), 0);
    }

    #[test]
    fn test_quantity_equals_number_of_adds() {
        let mut cart = Cart::new();
        for n in 1..=5 {
            assert_eq!(cart.add_item(id(7)), n);
        }
        cart.add_item(id(3));

        assert_eq!(cart.quantity_of(id(7)), 5);
        assert_eq!(cart.quantity_of(id(3)), 1);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_interleaved_adds() {
        let sequence = [1, 2, 1, 3, 2, 1];
        let mut cart = Cart::new();
        for n in sequence {
            cart.add_item(id(n));
        }

        for n in [1, 2, 3] {
            let expected = sequence.iter().filter(|&&s| s == n).count();
            assert_eq!(cart.quantity_of(id(n)) as usize, expected);
        }
    }

    #[test]
    fn test_lines_are_in_product_order_and_positive() {
        let mut cart = Cart::new();
        cart.add_item(id(9));
        cart.add_item(id(2));
        cart.add_item(id(2));

        let lines: Vec<_> = cart.lines().collect();
        assert_eq!(lines, vec![(id(2), 2), (id(9), 1)]);
        assert!(lines.iter().all(|(_, qty)| *qty > 0));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add_item(id(1));
        cart.add_item(id(2));

        assert!(cart.remove(id(1)));
        assert!(!cart.remove(id(1)));
        assert_eq!(cart.product_ids(), vec![id(2)]);

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_session_json_roundtrip() {
        let mut cart = Cart::new();
        cart.add_item(id(4));
        cart.add_item(id(4));
        cart.add_item(id(11));

        let value = serde_json::to_value(&cart).unwrap();
        assert_eq!(value, serde_json::json!({"4": 2, "11": 1}));

        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }
}
