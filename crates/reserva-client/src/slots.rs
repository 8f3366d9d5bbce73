//! # Slot Selection Workflow
//!
//! State machine coordinating the date, barber and time-slot choice for a
//! booking.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  NoDate ──set_date──► DateSet ──set_barber──► SlotsLoading              │
//! │    ▲                                               │                    │
//! │    │ reset                                  apply(generation)           │
//! │    │                                               ▼                    │
//! │    └────────────── SlotChosen ◄──choose── SlotsReady(list)              │
//! │                                                                         │
//! │  • A closed-day or out-of-window date never commits: the machine        │
//! │    stays exactly where it was                                           │
//! │  • Changing date, barber or duration after a slot was chosen clears     │
//! │    the chosen slot and reloads for the new triple                       │
//! │  • Responses carry a generation token; only the response matching      │
//! │    the latest request is applied, later answers for older requests      │
//! │    are discarded                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Offline Fallback
//! When the scheduler cannot be reached, the workflow installs a fixed
//! business-hours template (all marked available) instead of surfacing an
//! error. The template is a display-only convenience; the service
//! re-validates the slot at booking confirmation. The template deliberately
//! ignores the requested duration, matching the shop's standing behavior.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::api::ApiError;
use reserva_core::validation::BookingRules;
use reserva_core::{Minutes, TimeSlot, ValidationError};

// =============================================================================
// Request / Stage
// =============================================================================

/// One availability request, keyed by the (date, barber, duration) triple
/// and stamped with the generation that must still be current when the
/// response comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    pub generation: u64,
    pub date: NaiveDate,
    pub barber_id: String,
    pub duration: Minutes,
}

/// Observable stage of the workflow. Derived from the picker's fields, so
/// it can never disagree with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStage {
    /// No usable date yet (a barber alone does not advance the machine).
    NoDate,
    /// Date committed, barber still missing.
    DateSet,
    /// Date and barber set, request not yet answered.
    SlotsLoading,
    /// A slot list is on screen. An empty list is a valid ready state.
    SlotsReady,
    /// An available slot has been chosen.
    SlotChosen,
}

// =============================================================================
// Slot Picker
// =============================================================================

/// The date/barber/slot selection state machine.
///
/// `today` is fixed at construction: a picker lives for one booking flow,
/// and pinning it keeps the window validation deterministic and testable.
#[derive(Debug, Clone)]
pub struct SlotPicker {
    rules: BookingRules,
    fallback_template: Vec<String>,
    today: NaiveDate,

    date: Option<NaiveDate>,
    barber_id: Option<String>,
    duration: Minutes,

    generation: u64,
    loading: bool,
    slots: Option<Vec<TimeSlot>>,
    chosen: Option<String>,
}

impl SlotPicker {
    /// Creates a picker with the shop's rules, the offline template, and
    /// the duration of the cart being booked.
    pub fn new(
        rules: BookingRules,
        fallback_template: Vec<String>,
        today: NaiveDate,
        duration: Minutes,
    ) -> Self {
        SlotPicker {
            rules,
            fallback_template,
            today,
            date: None,
            barber_id: None,
            duration,
            generation: 0,
            loading: false,
            slots: None,
            chosen: None,
        }
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    pub fn stage(&self) -> SlotStage {
        if self.chosen.is_some() {
            SlotStage::SlotChosen
        } else if self.loading {
            SlotStage::SlotsLoading
        } else if self.slots.is_some() {
            SlotStage::SlotsReady
        } else if self.date.is_some() {
            SlotStage::DateSet
        } else {
            SlotStage::NoDate
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn barber_id(&self) -> Option<&str> {
        self.barber_id.as_deref()
    }

    pub fn duration(&self) -> Minutes {
        self.duration
    }

    /// The list on screen, if a response (or the fallback) has landed.
    pub fn slots(&self) -> Option<&[TimeSlot]> {
        self.slots.as_deref()
    }

    pub fn chosen(&self) -> Option<&str> {
        self.chosen.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Commits a booking date.
    ///
    /// A date on the weekly closing day, or outside the booking window, is
    /// rejected: nothing is committed, the stage does not move, and the
    /// error is returned for display.
    ///
    /// On success any chosen slot is cleared; if a barber is already set
    /// the next availability request is returned for dispatch.
    pub fn set_date(&mut self, date: NaiveDate) -> Result<Option<SlotRequest>, ValidationError> {
        self.rules.validate_date(date, self.today)?;
        self.date = Some(date);
        Ok(self.invalidate_slots())
    }

    /// Commits a barber choice. Clears any chosen slot; returns the next
    /// availability request if a date is already set.
    pub fn set_barber(&mut self, barber_id: impl Into<String>) -> Option<SlotRequest> {
        self.barber_id = Some(barber_id.into());
        self.invalidate_slots()
    }

    /// Updates the total duration (the cart changed underneath the picker).
    /// Keyed into the request triple, so this also invalidates.
    pub fn set_duration(&mut self, duration: Minutes) -> Option<SlotRequest> {
        if self.duration == duration {
            return None;
        }
        self.duration = duration;
        self.invalidate_slots()
    }

    /// Clears the date. Later fields go with it: barber, slots and chosen
    /// slot all reset (fields fill strictly left to right).
    pub fn clear_date(&mut self) {
        self.date = None;
        self.barber_id = None;
        self.discard_pending();
    }

    /// Clears the barber, keeping the date. Slots and chosen slot reset.
    pub fn clear_barber(&mut self) {
        self.barber_id = None;
        self.discard_pending();
    }

    /// Re-issues the latest request (explicit refresh, replacing the old
    /// page-reload habit). Returns None unless both date and barber are set.
    pub fn refresh(&mut self) -> Option<SlotRequest> {
        self.chosen = None;
        self.start_loading()
    }

    /// Full reset back to `NoDate`. In-flight requests are orphaned; their
    /// responses will fail the generation check and be discarded.
    pub fn reset(&mut self) {
        self.date = None;
        self.barber_id = None;
        self.discard_pending();
    }

    /// Applies an availability response.
    ///
    /// Returns whether the response was applied. A response whose
    /// generation does not match the latest request is stale and ignored;
    /// the winner is always the newest request, regardless of arrival
    /// order.
    ///
    /// A failed lookup installs the offline fallback template instead of an
    /// error state, logged but not surfaced.
    pub fn apply(&mut self, generation: u64, result: Result<Vec<TimeSlot>, ApiError>) -> bool {
        if generation != self.generation || !self.loading {
            debug!(
                stale = generation,
                current = self.generation,
                "discarding out-of-generation slot response"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(list) => {
                debug!(count = list.len(), "slot list ready");
                self.slots = Some(list);
            }
            Err(err) => {
                warn!(%err, "availability lookup failed, offering offline template");
                self.slots = Some(self.fallback_slots());
            }
        }
        true
    }

    /// Chooses a slot by its "HH:MM" time.
    ///
    /// Only succeeds for a slot present in the current list with
    /// `available == true`; anything else is silently ignored with no
    /// transition, matching how the UI greys out taken slots.
    pub fn choose(&mut self, time: &str) -> bool {
        let valid = self
            .slots
            .as_deref()
            .is_some_and(|slots| slots.iter().any(|s| s.available && s.time == time));
        if valid {
            self.chosen = Some(time.to_string());
        }
        valid
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// The offline template, every entry offered as available.
    fn fallback_slots(&self) -> Vec<TimeSlot> {
        self.fallback_template
            .iter()
            .map(|time| TimeSlot::new(time.clone(), true))
            .collect()
    }

    /// Drops the chosen slot and either starts a new load (both halves of
    /// the pair set) or clears the list entirely.
    fn invalidate_slots(&mut self) -> Option<SlotRequest> {
        self.chosen = None;
        if self.date.is_some() && self.barber_id.is_some() {
            self.start_loading()
        } else {
            self.discard_pending();
            None
        }
    }

    fn start_loading(&mut self) -> Option<SlotRequest> {
        let date = self.date?;
        let barber_id = self.barber_id.clone()?;
        self.generation += 1;
        self.loading = true;
        self.slots = None;
        Some(SlotRequest {
            generation: self.generation,
            date,
            barber_id,
            duration: self.duration,
        })
    }

    fn discard_pending(&mut self) {
        // Bumping the generation orphans any request still in flight.
        self.generation += 1;
        self.loading = false;
        self.slots = None;
        self.chosen = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
