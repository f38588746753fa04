//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices and cart totals are kept as [`Decimal`] so that summing a
//! cart never accumulates binary floating point error.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative price in the store currency.
///
/// Serialized as a decimal string (`"24.99"`) to keep the exact value across
/// JSON boundaries.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use vitrine_core::Price;
///
/// let price = Price::new(Decimal::new(2499, 2)).unwrap();
/// assert_eq!(price.to_string(), "$24.99");
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero, at cent scale so it renders as `0.00`.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, 2));

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    // Both operands are non-negative, so the sum is too.
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 2)),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_accepts_zero() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_sum_is_exact() {
        let prices = [
            Price::from_cents(2499).unwrap(),
            Price::from_cents(59999).unwrap(),
            Price::from_cents(2).unwrap(),
        ];
        let total: Price = prices.iter().sum();
        assert_eq!(total, Price::from_cents(62500).unwrap());
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::from_cents(8999).unwrap().to_string(), "$89.99");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_serde_uses_string_and_validates() {
        let price = Price::from_cents(14999).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"149.99\"");
        assert_eq!(serde_json::from_str::<Price>(&json).unwrap(), price);
        assert!(serde_json::from_str::<Price>("\"-5.00\"").is_err());
    }

    #[test]
    fn test_zero_and_empty_sum_serialize_with_cents() {
        assert_eq!(serde_json::to_string(&Price::ZERO).unwrap(), "\"0.00\"");

        let empty: Price = std::iter::empty::<Price>().sum();
        assert_eq!(serde_json::to_string(&empty).unwrap(), "\"0.00\"");
    }
}
