//! # Shift Guard
//!
//! Every money-affecting action (confirming a booking, registering a
//! payment, recording a till movement) requires an open shift. The guard
//! intercepts these intents, checks the live shift status, and either
//! executes immediately or parks the intent until a shift is opened.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  operator action ──► guard.run(intent)                                  │
//! │                          │                                              │
//! │                 re-fetch active_shift (never cached:                    │
//! │                 shift state changes out-of-band)                        │
//! │                          │                                              │
//! │            ┌─────────────┴─────────────┐                                │
//! │            ▼                           ▼                                │
//! │       shift open                  no shift open                         │
//! │            │                           │                                │
//! │      execute intent           park intent (last one wins),              │
//! │      return outcome           UI asks for an opening amount             │
//! │                                        │                                │
//! │                          guard.open_and_resume(amount)                  │
//! │                                        │                                │
//! │                        open_shift, then run the parked                  │
//! │                        intent exactly once, then discard                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! At most one intent is parked at a time: a new guarded action while one
//! is waiting replaces it. One operator, one register; a queue would replay
//! actions the operator no longer expects.

use tracing::{debug, info, warn};

use crate::api::BookingApi;
use crate::error::{ClientError, ClientResult};
use reserva_core::validation::validate_opening_amount;
use reserva_core::{
    Amount, Booking, BookingDraft, Movement, MovementCategory, MovementKind, Payment, Shift,
    Tender,
};

// =============================================================================
// Intents
// =============================================================================

/// A pending money-affecting action, held with its original arguments so a
/// resume executes exactly what the operator asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum MoneyIntent {
    /// Confirm the assembled booking draft.
    ConfirmBooking(BookingDraft),

    /// Register a payment against an existing booking.
    RegisterPayment {
        booking_id: String,
        amount: Amount,
        tender: Tender,
    },

    /// Record a standalone till movement.
    RecordMovement {
        kind: MovementKind,
        amount: Amount,
        tender: Tender,
        category: MovementCategory,
        description: String,
    },
}

impl MoneyIntent {
    /// Short label for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            MoneyIntent::ConfirmBooking(_) => "confirm_booking",
            MoneyIntent::RegisterPayment { .. } => "register_payment",
            MoneyIntent::RecordMovement { .. } => "record_movement",
        }
    }
}

/// What a successfully executed intent produced.
#[derive(Debug, Clone)]
pub enum IntentOutcome {
    Booked(Booking),
    PaymentRegistered(Payment),
    MovementRecorded(Movement),
}

/// Result of a guarded run.
#[derive(Debug, Clone)]
pub enum GuardOutcome {
    /// A shift was open; the intent executed and this is its result.
    Executed(IntentOutcome),

    /// No shift is open. The intent is parked; the UI should collect an
    /// opening amount and call [`ShiftGuard::open_and_resume`].
    ShiftRequired,
}

/// Result of opening a shift through the guard.
#[derive(Debug, Clone)]
pub struct GuardResume {
    /// The freshly opened shift.
    pub shift: Shift,

    /// The outcome of the resumed intent, when one was parked.
    pub resumed: Option<IntentOutcome>,
}

// =============================================================================
// Guard
// =============================================================================

/// Gates money-affecting intents behind an open shift.
#[derive(Debug, Default)]
pub struct ShiftGuard {
    pending: Option<MoneyIntent>,
}

impl ShiftGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The parked intent, if any (for the UI's "pending action" hint).
    pub fn pending(&self) -> Option<&MoneyIntent> {
        self.pending.as_ref()
    }

    /// Discards the parked intent without executing it (operator cancelled
    /// the shift-opening dialog).
    pub fn cancel_pending(&mut self) -> Option<MoneyIntent> {
        let cancelled = self.pending.take();
        if let Some(intent) = &cancelled {
            info!(intent = intent.kind(), "parked intent cancelled");
        }
        cancelled
    }

    /// Runs a money-affecting intent behind the shift check.
    ///
    /// The shift status is re-fetched on every call; it is never cached
    /// across intents because another register can open or close the shift
    /// out-of-band.
    pub async fn run<A>(&mut self, api: &A, intent: MoneyIntent) -> ClientResult<GuardOutcome>
    where
        A: BookingApi + ?Sized,
    {
        let shift = api.active_shift().await?;
        match shift {
            Some(shift) if shift.is_open() => {
                debug!(intent = intent.kind(), shift = %shift.id, "shift open, executing");
                let outcome = execute(api, intent).await?;
                Ok(GuardOutcome::Executed(outcome))
            }
            _ => {
                if let Some(old) = &self.pending {
                    debug!(
                        replaced = old.kind(),
                        with = intent.kind(),
                        "replacing parked intent"
                    );
                }
                self.pending = Some(intent);
                Ok(GuardOutcome::ShiftRequired)
            }
        }
    }

    /// Opens a shift with the given drawer float, then executes the parked
    /// intent (if any) exactly once with its original arguments.
    ///
    /// ## Failure Semantics
    /// - Opening fails: the parked intent is retained so the operator can
    ///   retry with a corrected amount.
    /// - Opening succeeds but the resumed intent fails: the failure is
    ///   surfaced, the intent is consumed, and the shift stays open.
    pub async fn open_and_resume<A>(
        &mut self,
        api: &A,
        opening_amount: Amount,
    ) -> ClientResult<GuardResume>
    where
        A: BookingApi + ?Sized,
    {
        validate_opening_amount(opening_amount)?;

        let shift = match api.open_shift(opening_amount).await {
            Ok(shift) => shift,
            Err(err) => {
                warn!(%err, "shift opening failed, parked intent retained");
                return Err(ClientError::ShiftOpenFailed(err));
            }
        };
        info!(shift = %shift.id, opening = %opening_amount, "shift opened");

        let resumed = match self.pending.take() {
            Some(intent) => {
                debug!(intent = intent.kind(), "resuming parked intent");
                Some(execute(api, intent).await?)
            }
            None => None,
        };

        Ok(GuardResume { shift, resumed })
    }
}

/// Executes an intent against its target API call. Failures become
/// [`ClientError::ActionFailed`]; the shift is left untouched.
async fn execute<A>(api: &A, intent: MoneyIntent) -> ClientResult<IntentOutcome>
where
    A: BookingApi + ?Sized,
{
    let result = match intent {
        MoneyIntent::ConfirmBooking(draft) => api
            .confirm_booking(&draft)
            .await
            .map(IntentOutcome::Booked),
        MoneyIntent::RegisterPayment {
            booking_id,
            amount,
            tender,
        } => api
            .register_payment(&booking_id, amount, tender)
            .await
            .map(IntentOutcome::PaymentRegistered),
        MoneyIntent::RecordMovement {
            kind,
            amount,
            tender,
            category,
            description,
        } => api
            .record_movement(kind, amount, tender, category, &description)
            .await
            .map(IntentOutcome::MovementRecorded),
    };
    result.map_err(ClientError::ActionFailed)
}

// =============================================================================
// Unit Tests
// =============================================================================
