//! # Error Types
//!
//! Domain-specific error types for resto-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  resto-core errors (this file)                                          │
//! │  ├── CoreError        - Domain rule failures                            │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  resto-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures (StorageError)      │
//! │                                                                         │
//! │  Kiosk errors (in app)                                                  │
//! │  └── ApiError         - What the presentation layer sees                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Display       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::order::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested status change is not in the transition table.
    ///
    /// ## When This Occurs
    /// ```text
    /// Completed ──► Pending     ✗ (terminal states never move)
    /// Pending   ──► Completed   ✗ (must be Accepted first)
    /// Accepted  ──► Rejected    ✗
    /// ```
    #[error("Cannot move order from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    /// A status string did not match any known status (casing is exact).
    #[error("Unknown order status: {0:?}")]
    UnknownStatus(String),

    /// The order snapshot could not be encoded or decoded.
    #[error("Order snapshot is malformed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything is persisted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Amount must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// An order was placed with no cart lines.
    #[error("Cannot place an order with an empty cart")]
    EmptyCart,
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
        let err = CoreError::IllegalTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::Pending,
        };
        assert_eq!(err.to_string(), "Cannot move order from Completed to Pending");

        let err = CoreError::UnknownStatus("pending".to_string());
        assert_eq!(err.to_string(), "Unknown order status: \"pending\"");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer_name".to_string(),
        };
        assert_eq!(err.to_string(), "customer_name is required");

        assert_eq!(
            ValidationError::EmptyCart.to_string(),
            "Cannot place an order with an empty cart"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::EmptyCart.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
