//! # reserva-core: Pure Business Logic for the Booking & Till Client
//!
//! This crate is the heart of the Clase V booking client. It contains all
//! business logic as pure functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Reserva Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Booking UI (TypeScript)                     │   │
//! │  │    Service picker ──► Date/Barber/Slot ──► Payments ──► Till    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    reserva-client                               │   │
//! │  │    Session, SlotPicker, ShiftGuard, DraftStore, BookingApi      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ reserva-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌────────────┐  │   │
//! │  │   │   money   │  │   cart    │  │  preview  │  │ validation │  │   │
//! │  │   │  Amount   │  │ServiceCart│  │  Delta    │  │   rules    │  │   │
//! │  │   │  parsing  │  │ CartLine  │  │ Closeout  │  │   checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Amount type and locale-tolerant price parsing
//! - [`duration`] - Minutes type and duration-text parsing
//! - [`cart`] - Service cart with quantity aggregation
//! - [`types`] - Domain types (Service, Shift, BookingDraft, ...)
//! - [`preview`] - Reconciliation preview for the shift-close form
//! - [`validation`] - Booking-date and amount rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Total parsing**: amount/duration normalization never fails; bad
//!    input defaults so the UI keeps working on operator-entered data
//! 2. **Integer money**: all monetary values are centavos (i64)
//! 3. **No authority here**: slot availability and shift reconciliation are
//!    owned by the remote service; this crate only previews

pub mod cart;
pub mod duration;
pub mod error;
pub mod money;
pub mod preview;
pub mod types;
pub mod validation;

pub use cart::{CartSummary, ServiceCart};
pub use duration::{parse_duration, Minutes, DEFAULT_SERVICE_MINUTES};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{parse_amount, Amount};
pub use preview::{preview_delta, CloseoutPreview, Delta, DeltaSign};
pub use types::*;
pub use validation::BookingRules;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct service lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single service line.
///
/// Guards against a typo (1000 instead of 10) turning into a day-long
/// appointment request.
pub const MAX_LINE_QUANTITY: i64 = 999;
