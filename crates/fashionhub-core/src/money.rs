//! # Money Module
//!
//! Provides the `Money` type for product prices.
//!
//! ## Integer Cents Inside, Decimal on the Wire
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The data store keeps `price` as a JSON number (e.g. 49.99).            │
//! │                                                                         │
//! │   wire: 49.99 ──► from_decimal ──► Money(4999) ──► Display "$49.99"     │
//! │                                          │                              │
//! │                                          └──► to_decimal ──► wire 49.99 │
//! │                                                                         │
//! │  Rounding happens exactly once, at the boundary. Everything in          │
//! │  between (forms, drafts, comparisons) works on whole cents.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fashionhub_core::money::Money;
//!
//! let price = Money::from_decimal(49.99).unwrap();
//! assert_eq!(price.cents(), 4999);
//! assert_eq!(price.to_string(), "$49.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Serializes as the raw cent count by default; fields that travel to the
/// data store use [`decimal`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use fashionhub_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a decimal amount, rounding to the nearest
    /// cent.
    ///
    /// Fails for NaN, infinities and amounts outside the `i64` cent range.
    ///
    /// ## Example
    /// ```rust
    /// use fashionhub_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(19.999).unwrap().cents(), 2000);
    /// assert!(Money::from_decimal(f64::NAN).is_err());
    /// ```
    pub fn from_decimal(amount: f64) -> Result<Self, CoreError> {
        if !amount.is_finite() {
            return Err(CoreError::InvalidAmount(amount.to_string()));
        }

        let cents = (amount * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return Err(CoreError::InvalidAmount(amount.to_string()));
        }

        Ok(Money(cents as i64))
    }

    /// Returns the value as a decimal amount (for the wire format only).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Value of `quantity` units at this price (stock valuation), or `None`
    /// when the product leaves the `i64` cent range.
    ///
    /// ## Example
    /// ```rust
    /// use fashionhub_core::money::Money;
    ///
    /// let unit = Money::from_cents(2999);
    /// assert_eq!(unit.multiply_quantity(3).unwrap().cents(), 8997);
    /// assert!(Money::from_cents(i64::MAX).multiply_quantity(2).is_none());
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$10.99` (`-$5.50` for negative amounts).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Decimal Wire Format
// =============================================================================

/// Serde adapter for `Money` fields stored as JSON decimal numbers.
///
/// ```rust
/// use fashionhub_core::money::Money;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     #[serde(with = "fashionhub_core::money::decimal")]
///     price: Money,
/// }
///
/// let row: Row = serde_json::from_str(r#"{"price": 49.99}"#).unwrap();
/// assert_eq!(row.price.cents(), 4999);
/// assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"price":49.99}"#);
/// ```
pub mod decimal {
    use super::Money;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount).map_err(de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
