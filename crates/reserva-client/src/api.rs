//! # Remote Service Boundary
//!
//! The `BookingApi` trait is the single seam between the client and the
//! remote booking/ledger service. Everything behind it (persistence, slot
//! computation, authoritative reconciliation) is a black box; the client
//! consumes slot lists, shift objects and operation results, and never
//! re-derives them.
//!
//! All monetary values crossing this boundary are canonical [`Amount`]s,
//! never locale-formatted strings; the tolerant parsing in reserva-core
//! happens strictly before this point.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use reserva_core::{
    Amount, Booking, BookingDraft, ClosedShift, Minutes, Movement, MovementCategory, MovementKind,
    Payment, Shift, TenderTotals, TimeSlot,
};
use reserva_core::Tender;

// =============================================================================
// Api Error
// =============================================================================

/// Failures at the remote boundary.
///
/// `Unreachable` is the variant the slot workflow recovers from locally
/// (offline fallback template); everything else surfaces to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service could not be reached at all (DNS, refused, timeout).
    #[error("booking service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with a rejection (validation, conflict).
    #[error("booking service rejected the request: {0}")]
    Rejected(String),

    /// The service answered with a payload the client could not read.
    #[error("malformed response from booking service: {0}")]
    BadResponse(String),
}

/// Convenience alias for Results at the remote boundary.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Booking Api
// =============================================================================

/// The remote booking/ledger service, as consumed by this client.
///
/// ## Contract Notes
/// - `availability` is keyed by (date, barber, duration); any of the three
///   changing invalidates a previously returned list
/// - `active_shift` reflects out-of-band changes (another register opening
///   or closing the shift), so callers re-fetch instead of caching
/// - The write operations are money-affecting and reach this trait only
///   through the shift guard (except `open_shift`/`close_shift`, which are
///   the guard's own levers)
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Free slots for one (date, barber, duration) triple. An empty list is
    /// a valid answer, not an error.
    async fn availability(
        &self,
        date: NaiveDate,
        barber_id: &str,
        duration: Minutes,
    ) -> ApiResult<Vec<TimeSlot>>;

    /// The currently open shift, if any.
    async fn active_shift(&self) -> ApiResult<Option<Shift>>;

    /// Opens a shift with the counted drawer float.
    async fn open_shift(&self, opening_amount: Amount) -> ApiResult<Shift>;

    /// Closes the open shift. The service recomputes the authoritative
    /// per-tender differences; the client's preview is never submitted.
    async fn close_shift(
        &self,
        counted: TenderTotals,
        notes: Option<String>,
    ) -> ApiResult<ClosedShift>;

    /// Confirms a complete booking draft.
    async fn confirm_booking(&self, draft: &BookingDraft) -> ApiResult<Booking>;

    /// Registers a payment against a booking.
    async fn register_payment(
        &self,
        booking_id: &str,
        amount: Amount,
        tender: Tender,
    ) -> ApiResult<Payment>;

    /// Records a till movement outside any booking (expenses, supplies).
    async fn record_movement(
        &self,
        kind: MovementKind,
        amount: Amount,
        tender: Tender,
        category: MovementCategory,
        description: &str,
    ) -> ApiResult<Movement>;
}
