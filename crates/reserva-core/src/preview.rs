//! # Reconciliation Preview
//!
//! Live expected-vs-counted deltas shown while the operator types closing
//! counts into the shift-close form.
//!
//! ## Advisory Only
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator types counted cash: 950.00                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  preview_delta(expected=1000.00, counted=950.00)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "Faltante $50,00" rendered next to the field                           │
//! │                                                                         │
//! │  The ledger service recomputes and persists the authoritative           │
//! │  reconciliation on close; nothing here ever writes back into Shift.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Amount;
use crate::types::{Tender, TenderTotals};

// =============================================================================
// Delta
// =============================================================================

/// Whether the drawer came out over or under the expected total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeltaSign {
    /// Counted >= expected (sobrante). An exact count is a zero surplus.
    Surplus,
    /// Counted < expected (faltante).
    Shortage,
}

impl std::fmt::Display for DeltaSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeltaSign::Surplus => f.write_str("surplus"),
            DeltaSign::Shortage => f.write_str("shortage"),
        }
    }
}

/// An unsigned difference plus its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Delta {
    pub amount: Amount,
    pub sign: DeltaSign,
}

/// Computes the display delta for one tender.
///
/// ## Example
/// ```rust
/// use reserva_core::preview::{preview_delta, DeltaSign};
/// use reserva_core::Amount;
///
/// let delta = preview_delta(Amount::from_major(1000), Amount::from_major(950));
/// assert_eq!(delta.amount, Amount::from_major(50));
/// assert_eq!(delta.sign, DeltaSign::Shortage);
/// ```
pub fn preview_delta(expected: Amount, counted: Amount) -> Delta {
    let sign = if counted >= expected {
        DeltaSign::Surplus
    } else {
        DeltaSign::Shortage
    };
    Delta {
        amount: (counted - expected).abs(),
        sign,
    }
}

// =============================================================================
// Closeout Preview
// =============================================================================

/// The shift-close form state: the open shift's expected totals plus
/// whatever counts the operator has entered so far.
///
/// A tender with no entered count shows no preview at all, not a zero
/// delta; an untouched field must not read as "drawer exactly balanced".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseoutPreview {
    expected: TenderTotals,
    counted_cash: Option<Amount>,
    counted_transfer: Option<Amount>,
    counted_deposit: Option<Amount>,
}

impl CloseoutPreview {
    /// Starts a preview against the open shift's expected totals.
    pub fn new(expected: TenderTotals) -> Self {
        CloseoutPreview {
            expected,
            counted_cash: None,
            counted_transfer: None,
            counted_deposit: None,
        }
    }

    pub fn expected(&self) -> TenderTotals {
        self.expected
    }

    /// Records the operator's count for one tender. Called on every
    /// keystroke with the re-parsed field value.
    pub fn enter(&mut self, tender: Tender, counted: Amount) {
        *self.slot_mut(tender) = Some(counted);
    }

    /// Clears one tender's count (field emptied).
    pub fn clear(&mut self, tender: Tender) {
        *self.slot_mut(tender) = None;
    }

    pub fn counted(&self, tender: Tender) -> Option<Amount> {
        *self.slot(tender)
    }

    /// The live delta for one tender; `None` until a count is entered.
    pub fn delta(&self, tender: Tender) -> Option<Delta> {
        self.counted(tender)
            .map(|counted| preview_delta(self.expected.get(tender), counted))
    }

    /// Overall delta across the tenders entered so far; `None` when nothing
    /// has been entered yet. Signed arithmetic first, then the display form.
    pub fn total_delta(&self) -> Option<Delta> {
        let entered: Vec<Tender> = Tender::ALL
            .into_iter()
            .filter(|t| self.counted(*t).is_some())
            .collect();
        if entered.is_empty() {
            return None;
        }

        let mut signed = Amount::zero();
        for tender in entered {
            let counted = self.counted(tender).unwrap_or_else(Amount::zero);
            signed += counted - self.expected.get(tender);
        }
        let sign = if signed.is_negative() {
            DeltaSign::Shortage
        } else {
            DeltaSign::Surplus
        };
        Some(Delta {
            amount: signed.abs(),
            sign,
        })
    }

    /// The counted totals to submit with the close request. Tenders never
    /// entered default to zero, which is what an untouched field means once
    /// the operator actually commits the close.
    pub fn counted_totals(&self) -> TenderTotals {
        let mut totals = TenderTotals::zero();
        for tender in Tender::ALL {
            totals.set(tender, self.counted(tender).unwrap_or_else(Amount::zero));
        }
        totals
    }

    fn slot(&self, tender: Tender) -> &Option<Amount> {
        match tender {
            Tender::Cash => &self.counted_cash,
            Tender::Transfer => &self.counted_transfer,
            Tender::Deposit => &self.counted_deposit,
        }
    }

    fn slot_mut(&mut self, tender: Tender) -> &mut Option<Amount> {
        match tender {
            Tender::Cash => &mut self.counted_cash,
            Tender::Transfer => &mut self.counted_transfer,
            Tender::Deposit => &mut self.counted_deposit,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
