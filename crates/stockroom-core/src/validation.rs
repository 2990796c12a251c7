//! # Validation Module
//!
//! Coercion of typed form text into the values the inventory API expects.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form text (console / renderer)                               │
//! │  └── Whatever the user typed, as String                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Numbers parsed, never clamped                                     │
//! │  ├── Blank optionals become null                                       │
//! │  └── Blank references become null (never "" or 0)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Server                                                       │
//! │  ├── Required names                                                    │
//! │  └── UNIQUE names, foreign keys                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only type coercion happens here. Rules the server already enforces (name
//! required, name unique) are left to the server.
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{parse_reference, parse_safe_stock};
//!
//! assert_eq!(parse_safe_stock("safe_stock", "").unwrap(), 100);
//! assert_eq!(parse_reference("category_id", "").unwrap(), None);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{EntityId, DEFAULT_CURRENCY, DEFAULT_SAFE_STOCK};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Fields
// =============================================================================

/// Parses a required non-negative price.
pub fn parse_price(field: &str, input: &str) -> ValidationResult<Money> {
    Money::parse_decimal(field, input)
}

/// Parses a required non-negative whole number (stock levels).
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::parse_count;
///
/// assert_eq!(parse_count("stock", " 12 ").unwrap(), 12);
/// assert!(parse_count("stock", "-1").is_err());
/// assert!(parse_count("stock", "1.5").is_err());
/// ```
pub fn parse_count(field: &str, input: &str) -> ValidationResult<i64> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        // "4.0" is a number but not a count
        let is_decimal = digits.split_once('.').is_some_and(|(w, f)| {
            !(w.is_empty() && f.is_empty())
                && w.chars().all(|c| c.is_ascii_digit())
                && f.chars().all(|c| c.is_ascii_digit())
        });
        return Err(if is_decimal {
            ValidationError::NotAnInteger {
                field: field.to_string(),
                value: text.to_string(),
            }
        } else {
            ValidationError::NotANumber {
                field: field.to_string(),
                value: text.to_string(),
            }
        });
    }

    let value: i64 = digits.parse().map_err(|_| ValidationError::TooLarge {
        field: field.to_string(),
    })?;

    if negative && value != 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Parses the current stock level. Required.
pub fn parse_stock(field: &str, input: &str) -> ValidationResult<i64> {
    parse_count(field, input)
}

/// Parses the reorder threshold. Blank means [`DEFAULT_SAFE_STOCK`].
pub fn parse_safe_stock(field: &str, input: &str) -> ValidationResult<i64> {
    if input.trim().is_empty() {
        return Ok(DEFAULT_SAFE_STOCK);
    }
    parse_count(field, input)
}

// =============================================================================
// References and Text
// =============================================================================

/// Parses a foreign-key selection. Blank means "none selected".
///
/// A selected reference must be a positive id; `0` is not a valid selection.
pub fn parse_reference(field: &str, input: &str) -> ValidationResult<Option<EntityId>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    let id = parse_count(field, input)?;
    if id == 0 {
        return Err(ValidationError::NotANumber {
            field: field.to_string(),
            value: input.trim().to_string(),
        });
    }
    Ok(Some(id))
}

/// Trims optional text; blank becomes `None`.
pub fn optional_text(input: &str) -> Option<String> {
    let text = input.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Trims a currency code; blank becomes [`DEFAULT_CURRENCY`].
///
/// Codes missing from the currency table are accepted unchanged.
pub fn currency_or_default(input: &str) -> String {
    optional_text(input).unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
