//! # Client Error Type
//!
//! Unified error type for the session workflows.
//!
//! ## Error Flow
//! ```text
//! ValidationError (local, pre-network)  ──┐
//! ApiError (remote boundary)            ──┼──► ClientError ──► UI message
//! DraftError (local persistence)        ──┘
//! ```
//!
//! Nothing here is fatal to the process: every failure is terminal to the
//! one attempted operation and recoverable by operator retry. The variants
//! keep the shift-guard distinctions the UI cares about: a failed shift
//! opening retains the parked intent, a failed guarded action does not.

use thiserror::Error;

use crate::api::ApiError;
use crate::draft::DraftError;
use reserva_core::ValidationError;

/// Errors surfaced by the session workflows.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local business-rule rejection; nothing was sent anywhere.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A remote call outside the guard's open/execute path failed
    /// (shift status check, shift close).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Opening the shift failed. The suspended intent, if any, is retained
    /// so the operator can retry.
    #[error("could not open the shift: {0}")]
    ShiftOpenFailed(ApiError),

    /// The guarded booking/payment/movement call itself failed after the
    /// shift was confirmed open. The shift is left as-is and the action is
    /// not retried automatically.
    #[error("action failed: {0}")]
    ActionFailed(ApiError),

    /// A till operation needs an open shift and none exists.
    #[error("no shift is open")]
    NoOpenShift,

    /// Draft persistence failed. The in-memory draft is unaffected.
    #[error("draft store failed: {0}")]
    Draft(#[from] DraftError),
}

/// Convenience alias for Results with ClientError.
pub type ClientResult<T> = Result<T, ClientError>;
