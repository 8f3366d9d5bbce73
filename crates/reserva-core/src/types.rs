//! # Domain Types
//!
//! Core domain types for the booking and till client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Service      │   │  BookingDraft   │   │     Shift       │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id             │   │  lines          │   │  id             │        │
//! │  │  price (text!)  │   │  totals         │   │  opening_amount │        │
//! │  │  duration(text!)│   │  date/barber/   │   │  expected per   │        │
//! │  │                 │   │  time_slot      │   │  tender         │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  Booking / Payment / Movement are produced by the remote service and    │
//! │  consumed read-only; the client never fabricates them.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Price and duration fields on `Service` arrive as operator-entered free
//! text from the catalog API; the lenient deserializers in [`crate::money`]
//! and [`crate::duration`] normalize them on the way in, so everything past
//! this boundary works with canonical `Amount`/`Minutes` values.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::duration::{self, Minutes};
use crate::money::{self, Amount};

// =============================================================================
// Catalog
// =============================================================================

/// A bookable service as served by the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Unique identifier.
    pub id: String,

    /// Display name shown to the customer and on the summary.
    pub name: String,

    /// Unit price. Arrives as a number or locale-formatted text.
    #[serde(default, deserialize_with = "money::de_lenient_amount")]
    pub price: Amount,

    /// Unit duration. Arrives as a number of minutes or text like "45 min".
    #[serde(default, deserialize_with = "duration::de_lenient_minutes")]
    pub duration: Minutes,
}

/// A staff member who can take bookings.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Barber {
    pub id: String,
    pub name: String,

    /// Free-text specialty line ("Fades", "Color").
    #[serde(default)]
    pub specialty: String,

    /// Soft-deleted barbers stay in the payload; the client filters them.
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Barber {
    /// Drops soft-deleted barbers from a catalog payload. They stay in the
    /// wire format for history screens but must never be offered for new
    /// bookings.
    pub fn bookable(list: Vec<Barber>) -> Vec<Barber> {
        list.into_iter().filter(|b| b.active).collect()
    }
}

// =============================================================================
// Slots
// =============================================================================

/// A discrete bookable time for a given (date, barber, duration) request.
/// Immutable once received; a new request replaces the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// Wall-clock time, "HH:MM".
    pub time: String,

    /// Whether the slot can still be chosen.
    pub available: bool,
}

impl TimeSlot {
    pub fn new(time: impl Into<String>, available: bool) -> Self {
        TimeSlot {
            time: time.into(),
            available,
        }
    }
}

// =============================================================================
// Tenders
// =============================================================================

/// A payment channel tracked separately for reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Tender {
    /// Physical cash in the drawer (efectivo).
    Cash,
    /// Bank transfer.
    Transfer,
    /// Booking deposit (seña).
    Deposit,
}

impl Tender {
    /// All tenders, in reconciliation display order.
    pub const ALL: [Tender; 3] = [Tender::Cash, Tender::Transfer, Tender::Deposit];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Tender::Cash => "cash",
            Tender::Transfer => "transfer",
            Tender::Deposit => "deposit",
        }
    }
}

impl std::fmt::Display for Tender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One amount per tender. Used for a shift's expected totals, the counted
/// closing totals, and the signed differences between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TenderTotals {
    pub cash: Amount,
    pub transfer: Amount,
    pub deposit: Amount,
}

impl TenderTotals {
    pub const fn zero() -> Self {
        TenderTotals {
            cash: Amount::zero(),
            transfer: Amount::zero(),
            deposit: Amount::zero(),
        }
    }

    pub const fn get(&self, tender: Tender) -> Amount {
        match tender {
            Tender::Cash => self.cash,
            Tender::Transfer => self.transfer,
            Tender::Deposit => self.deposit,
        }
    }

    pub fn set(&mut self, tender: Tender, amount: Amount) {
        match tender {
            Tender::Cash => self.cash = amount,
            Tender::Transfer => self.transfer = amount,
            Tender::Deposit => self.deposit = amount,
        }
    }

    /// Sum across all tenders.
    pub fn total(&self) -> Amount {
        self.cash + self.transfer + self.deposit
    }
}

// =============================================================================
// Shift (Caja)
// =============================================================================

/// Shift lifecycle as observed by the client. The ledger service enforces
/// that at most one shift is open; the client only ever sees "none open" or
/// "this one open".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Open,
    Closed,
}

/// An open accounting period on the till.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,

    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,

    /// Cash float counted into the drawer at opening.
    pub opening_amount: Amount,

    /// Running expected totals per tender, maintained by the ledger service
    /// as movements accrue. Never computed client-side.
    pub expected: TenderTotals,

    pub status: ShiftStatus,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }
}

/// A shift after the authoritative close reconciliation. `difference` is
/// signed (counted minus expected, per tender); display code derives the
/// surplus/shortage tag from the sign.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClosedShift {
    pub id: String,

    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,

    pub opening_amount: Amount,
    pub expected: TenderTotals,

    /// What the operator actually counted at close.
    pub counted: TenderTotals,

    /// counted - expected, per tender.
    pub difference: TenderTotals,

    #[ts(as = "String")]
    pub closed_at: DateTime<Utc>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl ClosedShift {
    /// Signed total difference across all tenders.
    pub fn total_difference(&self) -> Amount {
        self.difference.total()
    }
}

// =============================================================================
// Booking Draft
// =============================================================================

/// One selected service line in the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub service_id: String,

    /// Name at the time of adding (frozen; a later catalog rename does not
    /// change what the customer agreed to).
    pub name: String,

    pub unit_price: Amount,
    pub unit_duration: Minutes,

    /// Always >= 1; a quantity below 1 removes the line instead.
    pub quantity: i64,
}

impl CartLine {
    pub fn line_total(&self) -> Amount {
        self.unit_price.multiply_quantity(self.quantity)
    }

    pub fn line_duration(&self) -> Minutes {
        self.unit_duration.multiply_quantity(self.quantity)
    }
}

/// The in-progress booking being assembled by the customer.
///
/// ## Invariants
/// - `total_price`/`total_duration` are the fold over `lines` unless the
///   draft was restored from storage with explicit totals.
/// - Fields after `lines` fill strictly left to right (date, then barber,
///   then slot); clearing an earlier field clears everything after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub lines: Vec<CartLine>,
    pub total_price: Amount,
    pub total_duration: Minutes,

    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub barber_id: Option<String>,

    /// Chosen slot time, "HH:MM".
    #[serde(default)]
    pub time_slot: Option<String>,
}

impl BookingDraft {
    /// True when every field needed for confirmation is present.
    pub fn is_complete(&self) -> bool {
        !self.lines.is_empty()
            && self.date.is_some()
            && self.barber_id.is_some()
            && self.time_slot.is_some()
    }
}

// =============================================================================
// Remote Results
// =============================================================================

/// A confirmed booking, as returned by the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub barber_id: String,

    /// Slot time, "HH:MM".
    pub time: String,

    pub total: Amount,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A registered payment against a booking.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub amount: Amount,
    pub tender: Tender,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Direction of a till movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Income,
    Expense,
}

/// Accounting category for a till movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementCategory {
    Services,
    Products,
    Expenses,
    Salaries,
    Rent,
    Utilities,
    Other,
}

/// A recorded till movement, as returned by the ledger service.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: String,
    pub kind: MovementKind,
    pub amount: Amount,
    pub tender: Tender,
    pub category: MovementCategory,

    #[serde(default)]
    pub description: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// Amount signed by direction, the way the ledger folds movements.
    pub fn signed_amount(&self) -> Amount {
        match self.kind {
            MovementKind::Income => self.amount,
            MovementKind::Expense => -self.amount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_deserializes_free_text_fields() {
        let raw = r#"{
            "id": "svc-1",
            "name": "Corte Clásico",
            "price": "2.500,00",
            "duration": "45 min"
        }"#;
        let service: Service = serde_json::from_str(raw).unwrap();
        assert_eq!(service.price, Amount::from_cents(250000));
        assert_eq!(service.duration, Minutes::new(45));
    }

    #[test]
    fn service_deserializes_numeric_fields() {
        let raw = r#"{"id": "svc-2", "name": "Barba", "price": 1000, "duration": 30}"#;
        let service: Service = serde_json::from_str(raw).unwrap();
        assert_eq!(service.price, Amount::from_cents(100000));
        assert_eq!(service.duration, Minutes::new(30));
    }

    #[test]
    fn soft_deleted_barbers_are_not_bookable() {
        let raw = r#"[
            {"id": "b-1", "name": "Nico"},
            {"id": "b-2", "name": "Leo", "active": false}
        ]"#;
        let barbers: Vec<Barber> = serde_json::from_str(raw).unwrap();
        let bookable = Barber::bookable(barbers);
        assert_eq!(bookable.len(), 1);
        assert_eq!(bookable[0].id, "b-1");
    }

    #[test]
    fn tender_totals_indexing() {
        let mut totals = TenderTotals::zero();
        totals.set(Tender::Cash, Amount::from_cents(1000));
        totals.set(Tender::Deposit, Amount::from_cents(500));
        assert_eq!(totals.get(Tender::Cash), Amount::from_cents(1000));
        assert_eq!(totals.get(Tender::Transfer), Amount::zero());
        assert_eq!(totals.total(), Amount::from_cents(1500));
    }

    #[test]
    fn draft_completeness() {
        let mut draft = BookingDraft {
            lines: vec![CartLine {
                service_id: "svc-1".into(),
                name: "Corte".into(),
                unit_price: Amount::from_cents(250000),
                unit_duration: Minutes::new(45),
                quantity: 1,
            }],
            total_price: Amount::from_cents(250000),
            total_duration: Minutes::new(45),
            date: None,
            barber_id: None,
            time_slot: None,
        };
        assert!(!draft.is_complete());

        draft.date = NaiveDate::from_ymd_opt(2024, 6, 3);
        draft.barber_id = Some("b-1".into());
        draft.time_slot = Some("09:00".into());
        assert!(draft.is_complete());
    }

    #[test]
    fn movement_signed_amount() {
        let movement = Movement {
            id: "m-1".into(),
            kind: MovementKind::Expense,
            amount: Amount::from_cents(5000),
            tender: Tender::Cash,
            category: MovementCategory::Expenses,
            description: None,
            created_at: Utc::now(),
        };
        assert_eq!(movement.signed_amount(), Amount::from_cents(-5000));
    }
}
