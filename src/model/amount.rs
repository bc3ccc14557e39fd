//! Amount type for handling monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Amounts are persisted as JSON
//! numbers and displayed in their shortest plain decimal form, e.g. `5.50` is written as `5.5`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a monetary amount.
///
/// The wrapped value is always normalized, so `Amount::from_str("5.50")` and
/// `Amount::from_str("5.5")` are equal and both display as `5.5`.
///
/// # Examples
///
/// ```
/// # use expense_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("12.30").unwrap();
/// assert_eq!(amount.to_string(), "12.3");
/// ```
/// The most digits an amount may have before the decimal point. Amounts within this limit are
/// written to JSON without losing precision.
pub const MAX_WHOLE_DIGITS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Creates a new Amount from a Decimal value.
    pub fn new(value: Decimal) -> Self {
        Self {
            value: value.normalize(),
        }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }

    /// True if the whole part has at most [`MAX_WHOLE_DIGITS`] digits.
    pub fn is_within_limit(&self) -> bool {
        self.value.abs() < Decimal::from(10_i64.pow(MAX_WHOLE_DIGITS))
    }

    /// Adds `other`, clamping at the largest representable value instead of overflowing.
    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount::new(self.value.saturating_add(other.value))
    }

    /// Formats the amount with exactly two decimal places, e.g. `12.30`.
    pub fn to_fixed(&self) -> String {
        format!("{:.2}", self.value)
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(AmountError)?;
        Ok(Amount::new(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Stored documents hold amounts as plain JSON numbers
        if self.value.scale() == 0 {
            if let Some(whole) = self.value.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        // Parsing the decimal text gives the nearest float, which prints back as the same digits
        let float = f64::from_str(&self.value.to_string())
            .ok()
            .or_else(|| self.value.to_f64())
            .unwrap_or_default();
        serializer.serialize_f64(float)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl Visitor<'_> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::new(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount::new(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        // The shortest round-trip representation of the float, so 12.3 stays 12.3
        Amount::from_str(&v.to_string()).map_err(E::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::default(), Amount::saturating_add)
    }
}
