//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Form/reference rule violations                 │
//! │  └── ValidationError  - Input coercion failures                        │
//! │                                                                         │
//! │  stockroom-client errors (separate crate)                              │
//! │  └── ClientError      - Transport, API, session failures               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → notice to the user  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::{EntityId, EntityKind};

// =============================================================================
// Core Error
// =============================================================================

/// Core logic errors.
///
/// All of these are raised locally, before any request leaves the client.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An operation named an id that is not in the current snapshot.
    ///
    /// ## When This Occurs
    /// - Update requested for an id the list never returned
    /// - Edit requested for a row that a reload removed
    /// - Non-positive ids
    #[error("{kind} {id} is not in the current list")]
    InvalidReference { kind: EntityKind, id: EntityId },

    /// A form already has a submission waiting for the server.
    #[error("A {kind} submission is already in progress")]
    SubmissionInFlight { kind: EntityKind },

    /// A field name that the form does not have.
    #[error("{kind} form has no field '{field}'")]
    UnknownField { kind: EntityKind, field: String },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input coercion errors.
///
/// Form fields are typed text; these errors occur when a field cannot be
/// turned into the number the API expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required numeric field is empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is not a number.
    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: String, value: String },

    /// Field value is not a whole number.
    #[error("{field} must be a whole number, got '{value}'")]
    NotAnInteger { field: String, value: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value does not fit the wire type.
    #[error("{field} is too large")]
    TooLarge { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidReference {
            kind: EntityKind::Supplier,
            id: 42,
        };
        assert_eq!(err.to_string(), "Supplier 42 is not in the current list");

        let err = CoreError::SubmissionInFlight {
            kind: EntityKind::Product,
        };
        assert_eq!(
            err.to_string(),
            "A Product submission is already in progress"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::NotANumber {
            field: "price".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "price must be a number, got 'abc'");

        let err = ValidationError::Negative {
            field: "stock".to_string(),
        };
        assert_eq!(err.to_string(), "stock must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "stock".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "stock is required");
    }
}
