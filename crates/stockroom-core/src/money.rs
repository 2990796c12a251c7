//! # Money Module
//!
//! Provides the `Money` type for product prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The inventory API speaks JSON numbers:  { "price": 19.99 }             │
//! │  19.99 is not representable in binary floating point.                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    Wire 19.99 ──► round(19.99 × 100) = 1999 ──► Money(1999)             │
//! │    Money(1999) ──► 1999 / 100 ──► wire 19.99                            │
//! │                                                                         │
//! │  Typed input "19.99" never touches a float at all: the decimal text is  │
//! │  parsed digit by digit (see `Money::parse_decimal`).                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price = Money::from_cents(1950);
//! assert_eq!(price.to_decimal_string(), "19.50");
//!
//! let typed = Money::parse_decimal("price", "19.5").unwrap();
//! assert_eq!(typed, price);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::ValidationError;

/// Minor units per major unit. Every price is rendered with two decimals.
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in minor units (cents for USD).
///
/// Currency is carried separately by the product (`currency_code`); `Money`
/// is only the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ```rust
    /// use stockroom_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(100).cents(), 10_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Renders the amount with exactly two decimals and no symbol.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.cents_part())
    }

    /// Converts a wire number into minor units, rounding half away from zero.
    ///
    /// Returns `None` for NaN and infinities.
    pub fn from_wire(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * MINOR_PER_MAJOR as f64).round();
        if scaled.abs() > i64::MAX as f64 {
            return None;
        }
        Some(Money(scaled as i64))
    }

    /// Converts to the JSON number sent to the API.
    pub fn to_wire(&self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    /// Parses typed decimal text ("19", "19.5", "19.999") into Money.
    ///
    /// ## Rules
    /// - Digits with at most one `.` separator; surrounding whitespace ignored
    /// - Extra decimals round half up on the third digit
    /// - A leading `-` is reported as [`ValidationError::Negative`], any
    ///   other non-digit as [`ValidationError::NotANumber`]
    ///
    /// `field` names the form field in the returned error.
    pub fn parse_decimal(field: &str, input: &str) -> Result<Self, ValidationError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }

        let not_a_number = || ValidationError::NotANumber {
            field: field.to_string(),
            value: text.to_string(),
        };

        if let Some(rest) = text.strip_prefix('-') {
            // "-0" and "-0.00" are still zero; anything else is a negative price
            if rest.chars().all(|c| c == '0' || c == '.') && rest.contains('0') {
                return Ok(Money::zero());
            }
            return match Money::parse_decimal(field, rest) {
                Ok(_) => Err(ValidationError::Negative {
                    field: field.to_string(),
                }),
                Err(_) => Err(not_a_number()),
            };
        }

        let (whole, fraction) = match text.split_once('.') {
            Some((w, f)) => (w, f),
            None => (text, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(not_a_number());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(not_a_number());
        }

        let too_large = || ValidationError::TooLarge {
            field: field.to_string(),
        };

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| too_large())?
        };

        let digits: Vec<i64> = fraction
            .chars()
            .map(|c| i64::from(c as u8 - b'0'))
            .collect();
        let tenths = digits.first().copied().unwrap_or(0);
        let hundredths = digits.get(1).copied().unwrap_or(0);
        let round_up = digits.get(2).copied().unwrap_or(0) >= 5;

        let cents = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .ok_or_else(too_large)?;

        Ok(Money(cents))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the bare two-decimal amount; symbols come from the
/// currency table.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

/// Money travels as a JSON number in major units.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_wire())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::from_wire(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid money amount: {value}")))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(1950).to_decimal_string(), "19.50");
        assert_eq!(Money::from_cents(5).to_decimal_string(), "0.05");
        assert_eq!(Money::from_major(100).to_decimal_string(), "100.00");
        assert_eq!(Money::from_cents(-550).to_decimal_string(), "-5.50");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("price", "19.5").unwrap().cents(), 1950);
        assert_eq!(Money::parse_decimal("price", " 100 ").unwrap().cents(), 10_000);
        assert_eq!(Money::parse_decimal("price", ".75").unwrap().cents(), 75);
        assert_eq!(Money::parse_decimal("price", "3.").unwrap().cents(), 300);
        assert_eq!(Money::parse_decimal("price", "0").unwrap().cents(), 0);
        assert_eq!(Money::parse_decimal("price", "-0").unwrap().cents(), 0);
    }

    #[test]
    fn test_parse_decimal_rounds_third_digit() {
        assert_eq!(Money::parse_decimal("price", "19.994").unwrap().cents(), 1999);
        assert_eq!(Money::parse_decimal("price", "19.995").unwrap().cents(), 2000);
    }

    #[test]
    fn test_parse_decimal_rejects_bad_input() {
        assert!(matches!(
            Money::parse_decimal("price", ""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            Money::parse_decimal("price", "abc"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            Money::parse_decimal("price", "12abc"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            Money::parse_decimal("price", "1.2.3"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            Money::parse_decimal("price", "."),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            Money::parse_decimal("price", "-4.50"),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            Money::parse_decimal("price", "99999999999999999999"),
            Err(ValidationError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_wire_conversion() {
        assert_eq!(Money::from_wire(19.99), Some(Money::from_cents(1999)));
        assert_eq!(Money::from_wire(0.1), Some(Money::from_cents(10)));
        assert_eq!(Money::from_wire(f64::NAN), None);

        let json = serde_json::to_string(&Money::from_cents(1950)).unwrap();
        assert_eq!(json, "19.5");

        let parsed: Money = serde_json::from_str("100").unwrap();
        assert_eq!(parsed.cents(), 10_000);
    }
}
