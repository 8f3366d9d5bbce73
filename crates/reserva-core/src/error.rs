//! # Error Types
//!
//! Domain error types for reserva-core.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (service id, date, limit)
//! 3. Errors are enum variants, never strings
//! 4. Parsing is NOT here: amount/duration normalization is total and
//!    defaults instead of raising (the operator corrects bad data on screen)

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Local business-rule rejections, raised before any network call and
/// surfaced to the operator as-is. No state changes when one of these fires.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The shop does not take bookings on this weekday.
    #[error("no bookings on {weekday}: the shop is closed")]
    ClosedDay { weekday: chrono::Weekday },

    /// Date outside the accepted booking window.
    #[error("date {date} is outside the booking window ({min} to {max})")]
    OutsideWindow {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    /// Quantity must be a positive integer.
    #[error("quantity must be at least 1, got {got}")]
    QuantityNotPositive { got: i64 },

    /// Quantity exceeds the per-line ceiling.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Cart has exceeded the maximum number of distinct lines.
    #[error("cart cannot have more than {max} services")]
    CartTooLarge { max: usize },

    /// An amount that must not be negative (shift opening, counted totals).
    #[error("{field} cannot be negative")]
    AmountNegative { field: &'static str },

    /// An amount that must be strictly positive (payments, movements).
    #[error("{field} must be greater than zero")]
    AmountNotPositive { field: &'static str },

    /// A booking draft is missing a required field.
    #[error("{field} is required before the booking can be confirmed")]
    MissingField { field: &'static str },
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Service cannot be found in the cart.
    #[error("service not in cart: {0}")]
    ServiceNotInCart(String),

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Convenience alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn error_messages() {
        let err = ValidationError::ClosedDay {
            weekday: Weekday::Sun,
        };
        assert_eq!(err.to_string(), "no bookings on Sun: the shop is closed");

        let err = ValidationError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "quantity 1000 exceeds maximum allowed (999)"
        );
    }

    #[test]
    fn validation_converts_to_core_error() {
        let err: CoreError = ValidationError::AmountNegative { field: "opening" }.into();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
