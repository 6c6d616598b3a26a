//! Type-safe price representation using exact decimal arithmetic.
//!
//! Prices are held as a whole number of cents so that sums and products are
//! exact. `rust_decimal` is used at the edges: parsing user input and
//! exposing the amount.

use core::fmt;
use core::iter::Sum;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// More than two fractional digits.
    #[error("price can have at most 2 decimal places")]
    TooPrecise,
    /// The amount does not fit in the cent range.
    #[error("price is too large")]
    TooLarge,
}

/// A non-negative currency amount with cent precision.
///
/// ## Examples
///
/// ```
/// use smart_gadgets_core::Price;
///
/// let price = Price::parse("10.50").unwrap();
/// assert_eq!(price.cents(), 1050);
/// assert_eq!(price.to_string(), "$10.50");
///
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("1.999").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price {
    cents: i64,
}

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self { cents: 0 };

    /// Create a price from a number of cents.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `cents` is below zero.
    pub const fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            return Err(PriceError::Negative);
        }
        Ok(Self { cents })
    }

    /// Parse a price from user input such as `"19.99"` or `"5"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, negative, has
    /// more than two decimal places or overflows the cent range.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount: Decimal = s.parse().map_err(|_| PriceError::NotANumber)?;
        Self::try_from(amount)
    }

    /// Number of cents in this price.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// The price as a decimal amount (e.g. `10.50`).
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.cents, 2)
    }

    /// Multiply by a quantity, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(|cents| Self { cents })
    }

    /// Add two prices, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.cents.checked_add(other.cents) {
            Some(cents) => Some(Self { cents }),
            None => None,
        }
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        let normalized = amount.normalize();
        if normalized.scale() > 2 {
            return Err(PriceError::TooPrecise);
        }

        let cents = normalized
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|c| c.to_i64())
            .ok_or(PriceError::TooLarge)?;

        Ok(Self { cents })
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.amount()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.amount())
    }
}

/// Saturates at `i64::MAX` cents; callers that must reject overflow use
/// [`Price::checked_add`].
impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let cents = iter.fold(0_i64, |acc, p| acc.saturating_add(p.cents));
        Self { cents }
    }
}
