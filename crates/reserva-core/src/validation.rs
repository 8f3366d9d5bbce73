//! # Validation Module
//!
//! Business-rule validation for the booking workflow and the till.
//!
//! Everything here runs locally, before any network call, and rejects with a
//! [`ValidationError`] the UI shows verbatim. The remote service re-validates
//! on its side; these checks exist so the operator gets an answer without a
//! round trip.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Amount;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Booking Date Rules
// =============================================================================

/// Date-level booking rules: the weekly closing day and the rolling window
/// inside which the shop takes bookings.
///
/// ## Example
/// ```rust
/// use chrono::{NaiveDate, Weekday};
/// use reserva_core::validation::BookingRules;
///
/// let rules = BookingRules::default();
/// let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(); // a Monday
/// let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
///
/// assert!(rules.validate_date(today, today).is_ok());
/// assert!(rules.validate_date(sunday, today).is_err());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRules {
    /// Weekday on which no bookings are accepted.
    pub closed_weekday: Weekday,

    /// Number of days ahead of today that remain bookable.
    pub window_days: u64,
}

impl BookingRules {
    /// Validates a candidate booking date against the rules.
    ///
    /// ## Rules
    /// - The closing weekday is rejected outright.
    /// - Dates before `today` or past `today + window_days` are rejected.
    pub fn validate_date(&self, date: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
        if date.weekday() == self.closed_weekday {
            return Err(ValidationError::ClosedDay {
                weekday: self.closed_weekday,
            });
        }

        let max = today
            .checked_add_days(Days::new(self.window_days))
            .unwrap_or(today);
        if date < today || date > max {
            return Err(ValidationError::OutsideWindow {
                date,
                min: today,
                max,
            });
        }

        Ok(())
    }
}

/// Sundays closed, 30-day window: the shop's standing policy.
impl Default for BookingRules {
    fn default() -> Self {
        BookingRules {
            closed_weekday: Weekday::Sun,
            window_days: 30,
        }
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (values < 1 route to removal before this is called)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::QuantityNotPositive { got: qty });
    }
    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::QuantityTooLarge {
            requested: qty,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

/// Validates the number of distinct cart lines before appending a new one.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::CartTooLarge {
            max: MAX_CART_LINES,
        });
    }
    Ok(())
}

/// Validates a shift opening amount. Zero is a legal float (empty drawer).
pub fn validate_opening_amount(amount: Amount) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::AmountNegative {
            field: "opening amount",
        });
    }
    Ok(())
}

/// Validates a counted closing amount for one tender.
pub fn validate_counted_amount(amount: Amount) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::AmountNegative {
            field: "counted amount",
        });
    }
    Ok(())
}

/// Validates a payment or movement amount. Zero-value payments are rejected.
pub fn validate_payment_amount(amount: Amount) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::AmountNotPositive { field: "amount" });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
