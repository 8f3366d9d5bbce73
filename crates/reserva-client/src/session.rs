//! # Session Context
//!
//! One operator session owns one of everything: the cart, the slot picker,
//! the shift guard and the draft store, wired to one remote API handle.
//! The session object replaces the ambient page-level state of the old
//! frontend; it is created at login, passed by reference to whoever needs
//! it, and dropped at logout. No process-wide singletons.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  cart ──(services, total, duration)──► picker ──(date, barber, slot)──┐ │
//! │                                                                       │ │
//! │                              BookingDraft ◄───────────────────────────┘ │
//! │                                   │                                     │
//! │          confirm / pay / move ────┼──► shift guard ──► remote service   │
//! │                                   │                                     │
//! │                          draft store (resume after navigation)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The remote calls issued here are the only suspension points; every
//! response that mutates picker state passes the generation check first.

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::BookingApi;
use crate::config::ClientConfig;
use crate::draft::DraftStore;
use crate::error::{ClientError, ClientResult};
use crate::guard::{GuardOutcome, GuardResume, IntentOutcome, MoneyIntent, ShiftGuard};
use crate::slots::{SlotPicker, SlotRequest, SlotStage};
use reserva_core::validation::{validate_counted_amount, validate_payment_amount};
use reserva_core::{
    Amount, BookingDraft, CartSummary, ClosedShift, CloseoutPreview, MovementCategory,
    MovementKind, Service, ServiceCart, Shift, Tender, TimeSlot, ValidationError,
};

// =============================================================================
// Session
// =============================================================================

/// Session-scoped context for the booking and till workflows.
#[derive(Debug)]
pub struct Session<A: BookingApi, D: DraftStore> {
    api: A,
    drafts: D,
    config: ClientConfig,
    session_id: Uuid,

    cart: ServiceCart,
    picker: SlotPicker,
    guard: ShiftGuard,

    /// The availability request due for dispatch, produced by the latest
    /// cart/date/barber change and consumed by [`Session::load_slots`].
    pending_request: Option<SlotRequest>,
}

impl<A: BookingApi, D: DraftStore> Session<A, D> {
    /// Creates a session starting today.
    pub fn new(api: A, drafts: D, config: ClientConfig) -> Self {
        Self::starting_on(api, drafts, config, Local::now().date_naive())
    }

    /// Creates a session with an explicit "today" (deterministic tests,
    /// date-boundary reproductions).
    pub fn starting_on(api: A, drafts: D, config: ClientConfig, today: NaiveDate) -> Self {
        let picker = SlotPicker::new(
            config.booking.rules(),
            config.till.fallback_slots.clone(),
            today,
            config.booking.default_duration(),
        );
        let session_id = Uuid::new_v4();
        debug!(%session_id, %today, "session started");
        Session {
            api,
            drafts,
            config,
            session_id,
            cart: ServiceCart::new(),
            picker,
            guard: ShiftGuard::new(),
            pending_request: None,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    pub fn cart(&self) -> &ServiceCart {
        &self.cart
    }

    pub fn cart_summary(&self) -> CartSummary {
        CartSummary::from(&self.cart)
    }

    /// Adds a service (or replaces its quantity). The cart's new total
    /// duration feeds the slot request triple, so a change here can
    /// invalidate an already-loaded slot list.
    pub fn add_service(&mut self, service: &Service, quantity: i64) -> ClientResult<()> {
        self.cart.add_or_set_quantity(service, quantity)?;
        self.sync_duration();
        Ok(())
    }

    pub fn update_quantity(&mut self, service_id: &str, quantity: i64) -> ClientResult<()> {
        self.cart.update_quantity(service_id, quantity)?;
        self.sync_duration();
        Ok(())
    }

    pub fn remove_service(&mut self, service_id: &str) {
        self.cart.remove(service_id);
        self.sync_duration();
    }

    fn sync_duration(&mut self) {
        let duration = if self.cart.is_empty() {
            self.config.booking.default_duration()
        } else {
            self.cart.total_duration()
        };
        if let Some(request) = self.picker.set_duration(duration) {
            self.pending_request = Some(request);
        }
    }

    // -------------------------------------------------------------------------
    // Slot Selection
    // -------------------------------------------------------------------------

    pub fn slot_stage(&self) -> SlotStage {
        self.picker.stage()
    }

    pub fn slots(&self) -> Option<&[TimeSlot]> {
        self.picker.slots()
    }

    pub fn chosen_slot(&self) -> Option<&str> {
        self.picker.chosen()
    }

    /// Commits a booking date. Closed-day and out-of-window dates are
    /// rejected without state change.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), ValidationError> {
        if let Some(request) = self.picker.set_date(date)? {
            self.pending_request = Some(request);
        }
        Ok(())
    }

    pub fn select_barber(&mut self, barber_id: impl Into<String>) {
        if let Some(request) = self.picker.set_barber(barber_id) {
            self.pending_request = Some(request);
        }
    }

    /// Chooses an available slot; unavailable times are ignored.
    pub fn choose_slot(&mut self, time: &str) -> bool {
        self.picker.choose(time)
    }

    /// Abandons the selection, back to `NoDate`.
    pub fn reset_selection(&mut self) {
        self.picker.reset();
        self.pending_request = None;
    }

    /// The availability request awaiting dispatch, if any.
    pub fn pending_request(&self) -> Option<&SlotRequest> {
        self.pending_request.as_ref()
    }

    /// Dispatches the pending availability request and applies the
    /// response. Returns whether a response was applied.
    ///
    /// The generation check runs after the await: if the selection moved on
    /// while the call was in flight, the response is discarded and the
    /// newer request (already pending) decides the final list.
    pub async fn load_slots(&mut self) -> ClientResult<bool> {
        let Some(request) = self.pending_request.take() else {
            return Ok(false);
        };
        let result = self
            .api
            .availability(request.date, &request.barber_id, request.duration)
            .await;
        Ok(self.picker.apply(request.generation, result))
    }

    /// Re-issues the latest (date, barber, duration) request and reloads.
    /// The explicit replacement for refresh-by-page-reload.
    pub async fn refresh_slots(&mut self) -> ClientResult<bool> {
        if let Some(request) = self.picker.refresh() {
            self.pending_request = Some(request);
        }
        self.load_slots().await
    }

    // -------------------------------------------------------------------------
    // Draft
    // -------------------------------------------------------------------------

    /// The draft as currently assembled: cart lines plus whatever selection
    /// fields are filled so far.
    pub fn draft(&self) -> BookingDraft {
        BookingDraft {
            lines: self.cart.lines().to_vec(),
            total_price: self.cart.total_price(),
            total_duration: self.cart.total_duration(),
            date: self.picker.date(),
            barber_id: self.picker.barber_id().map(str::to_owned),
            time_slot: self.picker.chosen().map(str::to_owned),
        }
    }

    /// Persists the current draft for resumption after navigation.
    pub fn save_draft(&self) -> ClientResult<()> {
        self.drafts.save(&self.draft())?;
        Ok(())
    }

    /// Restores a persisted draft, if one exists.
    ///
    /// Lines are restored verbatim. The selection fields re-validate left
    /// to right: a date that no longer passes the rules (the draft aged
    /// past it) is dropped along with everything after it. The chosen slot
    /// is never restored; availability must be re-confirmed by a fresh
    /// request.
    pub fn restore_draft(&mut self) -> ClientResult<bool> {
        let Some(saved) = self.drafts.load()? else {
            return Ok(false);
        };
        debug!(lines = saved.lines.len(), "restoring draft");

        self.cart = ServiceCart::from_lines(saved.lines);
        self.picker.reset();
        self.pending_request = None;
        self.sync_duration();

        if let Some(date) = saved.date {
            if self.select_date(date).is_err() {
                warn!(%date, "stored draft date no longer bookable, dropped");
                return Ok(true);
            }
            if let Some(barber_id) = saved.barber_id {
                self.select_barber(barber_id);
            }
        }
        Ok(true)
    }

    /// Discards the persisted draft.
    pub fn clear_draft(&self) -> ClientResult<()> {
        self.drafts.clear()?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Money-Affecting Actions (guarded)
    // -------------------------------------------------------------------------

    /// Confirms the assembled booking. Requires a complete draft; routed
    /// through the shift guard. On a confirmed booking the cart, the
    /// selection and the stored draft are cleared for the next customer.
    pub async fn confirm_booking(&mut self) -> ClientResult<GuardOutcome> {
        let draft = self.draft();
        Self::require_complete(&draft)?;

        let outcome = self
            .guard
            .run(&self.api, MoneyIntent::ConfirmBooking(draft))
            .await?;
        if matches!(
            outcome,
            GuardOutcome::Executed(IntentOutcome::Booked(_))
        ) {
            self.finish_booking();
        }
        Ok(outcome)
    }

    /// Registers a payment against an existing booking, behind the guard.
    pub async fn register_payment(
        &mut self,
        booking_id: impl Into<String>,
        amount: Amount,
        tender: Tender,
    ) -> ClientResult<GuardOutcome> {
        validate_payment_amount(amount)?;
        self.guard
            .run(
                &self.api,
                MoneyIntent::RegisterPayment {
                    booking_id: booking_id.into(),
                    amount,
                    tender,
                },
            )
            .await
    }

    /// Records a standalone till movement, behind the guard.
    pub async fn record_movement(
        &mut self,
        kind: MovementKind,
        amount: Amount,
        tender: Tender,
        category: MovementCategory,
        description: impl Into<String>,
    ) -> ClientResult<GuardOutcome> {
        validate_payment_amount(amount)?;
        self.guard
            .run(
                &self.api,
                MoneyIntent::RecordMovement {
                    kind,
                    amount,
                    tender,
                    category,
                    description: description.into(),
                },
            )
            .await
    }

    // -------------------------------------------------------------------------
    // Shift (Caja)
    // -------------------------------------------------------------------------

    /// Live shift status, re-fetched every time.
    pub async fn active_shift(&self) -> ClientResult<Option<Shift>> {
        Ok(self.api.active_shift().await?)
    }

    /// Opens a shift and resumes the parked intent, if any. A resumed
    /// booking confirmation clears the cart and draft like the direct path.
    pub async fn open_shift(&mut self, opening_amount: Amount) -> ClientResult<GuardResume> {
        let resume = self.guard.open_and_resume(&self.api, opening_amount).await?;
        if matches!(resume.resumed, Some(IntentOutcome::Booked(_))) {
            self.finish_booking();
        }
        Ok(resume)
    }

    /// Drops the parked intent (operator dismissed the shift dialog).
    pub fn cancel_shift_opening(&mut self) -> Option<MoneyIntent> {
        self.guard.cancel_pending()
    }

    /// The intent waiting on a shift, if any.
    pub fn pending_intent(&self) -> Option<&MoneyIntent> {
        self.guard.pending()
    }

    /// Starts a close-form preview against the open shift's expected
    /// totals. Purely advisory; the ledger recomputes on close.
    pub async fn closeout_preview(&self) -> ClientResult<CloseoutPreview> {
        match self.api.active_shift().await? {
            Some(shift) if shift.is_open() => Ok(CloseoutPreview::new(shift.expected)),
            _ => Err(ClientError::NoOpenShift),
        }
    }

    /// Closes the shift with the operator's counted totals. The returned
    /// reconciliation is the authoritative one computed by the ledger.
    pub async fn close_shift(
        &self,
        preview: &CloseoutPreview,
        notes: Option<String>,
    ) -> ClientResult<ClosedShift> {
        for tender in Tender::ALL {
            if let Some(counted) = preview.counted(tender) {
                validate_counted_amount(counted)?;
            }
        }
        Ok(self.api.close_shift(preview.counted_totals(), notes).await?)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn require_complete(draft: &BookingDraft) -> Result<(), ValidationError> {
        if draft.lines.is_empty() {
            return Err(ValidationError::MissingField { field: "services" });
        }
        if draft.date.is_none() {
            return Err(ValidationError::MissingField { field: "date" });
        }
        if draft.barber_id.is_none() {
            return Err(ValidationError::MissingField { field: "barber" });
        }
        if draft.time_slot.is_none() {
            return Err(ValidationError::MissingField { field: "time slot" });
        }
        Ok(())
    }

    /// Post-confirmation cleanup: next customer starts from a blank slate.
    fn finish_booking(&mut self) {
        self.cart.clear();
        self.picker.reset();
        self.pending_request = None;
        if let Err(err) = self.drafts.clear() {
            // Not worth failing a confirmed booking over.
            warn!(%err, "could not clear stored draft");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ApiResult};
    use crate::draft::MemoryDraftStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use reserva_core::{Booking, Minutes, Movement, Payment, ShiftStatus, TenderTotals};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn service(id: &str, price: &str, duration: &str) -> Service {
        Service {
            id: id.to_string(),
            name: format!("Service {}", id),
            price: Amount::parse(price),
            duration: Minutes::parse(duration),
        }
    }

    fn open_shift_obj(expected_cash: i64) -> Shift {
        Shift {
            id: "shift-1".into(),
            opened_at: Utc::now(),
            opening_amount: Amount::from_major(100),
            expected: TenderTotals {
                cash: Amount::from_major(expected_cash),
                transfer: Amount::zero(),
                deposit: Amount::zero(),
            },
            status: ShiftStatus::Open,
        }
    }

    /// Scripted remote service for session-level tests.
    #[derive(Default)]
    struct ScriptedApi {
        shift: Mutex<Option<Shift>>,
        slot_responses: Mutex<VecDeque<ApiResult<Vec<TimeSlot>>>>,
        availability_calls: Mutex<Vec<(NaiveDate, String, Minutes)>>,
        confirmed: Mutex<Vec<BookingDraft>>,
        closes: Mutex<Vec<(TenderTotals, Option<String>)>>,
    }

    impl ScriptedApi {
        fn with_shift(expected_cash: i64) -> Self {
            let api = ScriptedApi::default();
            *api.shift.lock().unwrap() = Some(open_shift_obj(expected_cash));
            api
        }

        fn queue_slots(&self, response: ApiResult<Vec<TimeSlot>>) {
            self.slot_responses.lock().unwrap().push_back(response);
        }
    }

    #[async_trait]
    impl BookingApi for ScriptedApi {
        async fn availability(
            &self,
            date: NaiveDate,
            barber_id: &str,
            duration: Minutes,
        ) -> ApiResult<Vec<TimeSlot>> {
            self.availability_calls
                .lock()
                .unwrap()
                .push((date, barber_id.to_string(), duration));
            self.slot_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(vec![TimeSlot::new("09:00", true)]))
        }

        async fn active_shift(&self) -> ApiResult<Option<Shift>> {
            Ok(self.shift.lock().unwrap().clone())
        }

        async fn open_shift(&self, opening_amount: Amount) -> ApiResult<Shift> {
            let shift = Shift {
                opening_amount,
                ..open_shift_obj(0)
            };
            *self.shift.lock().unwrap() = Some(shift.clone());
            Ok(shift)
        }

        async fn close_shift(
            &self,
            counted: TenderTotals,
            notes: Option<String>,
        ) -> ApiResult<ClosedShift> {
            let shift = self
                .shift
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| ApiError::Rejected("no open shift".into()))?;
            self.closes.lock().unwrap().push((counted, notes.clone()));

            // The ledger's authoritative arithmetic, scripted.
            let mut difference = TenderTotals::zero();
            for tender in Tender::ALL {
                difference.set(tender, counted.get(tender) - shift.expected.get(tender));
            }
            Ok(ClosedShift {
                id: shift.id,
                opened_at: shift.opened_at,
                opening_amount: shift.opening_amount,
                expected: shift.expected,
                counted,
                difference,
                closed_at: Utc::now(),
                notes,
            })
        }

        async fn confirm_booking(&self, draft: &BookingDraft) -> ApiResult<Booking> {
            self.confirmed.lock().unwrap().push(draft.clone());
            Ok(Booking {
                id: format!("bk-{}", self.confirmed.lock().unwrap().len()),
                date: draft.date.unwrap_or(NaiveDate::MIN),
                barber_id: draft.barber_id.clone().unwrap_or_default(),
                time: draft.time_slot.clone().unwrap_or_default(),
                total: draft.total_price,
                created_at: Utc::now(),
            })
        }

        async fn register_payment(
            &self,
            booking_id: &str,
            amount: Amount,
            tender: Tender,
        ) -> ApiResult<Payment> {
            Ok(Payment {
                id: "pay-1".into(),
                booking_id: booking_id.to_string(),
                amount,
                tender,
                created_at: Utc::now(),
            })
        }

        async fn record_movement(
            &self,
            kind: MovementKind,
            amount: Amount,
            tender: Tender,
            category: MovementCategory,
            description: &str,
        ) -> ApiResult<Movement> {
            Ok(Movement {
                id: "mov-1".into(),
                kind,
                amount,
                tender,
                category,
                description: Some(description.to_string()),
                created_at: Utc::now(),
            })
        }
    }

    fn session(api: ScriptedApi) -> Session<ScriptedApi, MemoryDraftStore> {
        Session::starting_on(
            api,
            MemoryDraftStore::new(),
            ClientConfig::default(),
            monday(),
        )
    }

    #[tokio::test]
    async fn full_booking_flow_with_open_shift() {
        let api = ScriptedApi::with_shift(0);
        api.queue_slots(Ok(vec![
            TimeSlot::new("09:00", true),
            TimeSlot::new("10:00", false),
        ]));
        let mut s = session(api);

        // Cart: A ×1 at 2.500,00 / 45 min, B ×2 at 1000 / 30 min.
        s.add_service(&service("a", "2.500,00", "45 min"), 1).unwrap();
        s.add_service(&service("b", "1000", "30"), 2).unwrap();
        assert_eq!(s.cart().total_price(), Amount::from_cents(450000));
        assert_eq!(s.cart().total_duration(), Minutes::new(105));

        s.select_date(monday()).unwrap();
        s.select_barber("b-1");
        assert_eq!(s.slot_stage(), SlotStage::SlotsLoading);

        assert!(s.load_slots().await.unwrap());
        assert_eq!(s.slot_stage(), SlotStage::SlotsReady);

        // The request carried the cart's total duration.
        let calls = s.api.availability_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2, Minutes::new(105));
        drop(calls);

        assert!(s.choose_slot("09:00"));
        let outcome = s.confirm_booking().await.unwrap();
        assert!(matches!(
            outcome,
            GuardOutcome::Executed(IntentOutcome::Booked(_))
        ));

        // Blank slate for the next customer.
        assert!(s.cart().is_empty());
        assert_eq!(s.slot_stage(), SlotStage::NoDate);
        assert!(s.drafts.load().unwrap().is_none());

        let confirmed = s.api.confirmed.lock().unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].total_price, Amount::from_cents(450000));
        assert_eq!(confirmed[0].time_slot.as_deref(), Some("09:00"));
    }

    #[tokio::test]
    async fn incomplete_draft_is_rejected_locally() {
        let api = ScriptedApi::with_shift(0);
        let mut s = session(api);

        let err = s.confirm_booking().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::MissingField { field: "services" })
        ));

        s.add_service(&service("a", "2500", "45"), 1).unwrap();
        let err = s.confirm_booking().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::MissingField { field: "date" })
        ));
        assert!(s.api.confirmed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn booking_suspends_until_shift_opens() {
        let api = ScriptedApi::default(); // no shift open
        api.queue_slots(Ok(vec![TimeSlot::new("09:00", true)]));
        let mut s = session(api);

        s.add_service(&service("a", "2500", "45"), 1).unwrap();
        s.select_date(monday()).unwrap();
        s.select_barber("b-1");
        s.load_slots().await.unwrap();
        s.choose_slot("09:00");

        let outcome = s.confirm_booking().await.unwrap();
        assert!(matches!(outcome, GuardOutcome::ShiftRequired));
        assert!(s.pending_intent().is_some());
        assert!(s.api.confirmed.lock().unwrap().is_empty());
        // Cart untouched while suspended.
        assert!(!s.cart().is_empty());

        let resume = s.open_shift(Amount::from_major(500)).await.unwrap();
        assert!(matches!(resume.resumed, Some(IntentOutcome::Booked(_))));
        assert_eq!(s.api.confirmed.lock().unwrap().len(), 1);
        assert!(s.cart().is_empty());
        assert!(s.pending_intent().is_none());
    }

    #[tokio::test]
    async fn scheduler_outage_falls_back_to_template() {
        let api = ScriptedApi::with_shift(0);
        api.queue_slots(Err(ApiError::Unreachable("timeout".into())));
        let mut s = session(api);

        s.add_service(&service("a", "2500", "45"), 1).unwrap();
        s.select_date(monday()).unwrap();
        s.select_barber("b-1");
        assert!(s.load_slots().await.unwrap());

        let slots = s.slots().unwrap();
        assert_eq!(slots.len(), 9); // default business-hours template
        assert!(slots.iter().all(|slot| slot.available));
    }

    #[tokio::test]
    async fn draft_saves_and_restores_across_sessions() {
        let store = MemoryDraftStore::new();
        {
            let api = ScriptedApi::with_shift(0);
            let mut s = Session::starting_on(api, store, ClientConfig::default(), monday());
            s.add_service(&service("a", "2.500,00", "45 min"), 2).unwrap();
            s.select_date(monday()).unwrap();
            s.select_barber("b-1");
            s.save_draft().unwrap();

            // Simulate navigation: recover the store for a fresh session.
            let Session { drafts, .. } = s;
            let api = ScriptedApi::with_shift(0);
            let mut resumed =
                Session::starting_on(api, drafts, ClientConfig::default(), monday());
            assert!(resumed.restore_draft().unwrap());

            assert_eq!(resumed.cart().total_quantity(), 2);
            assert_eq!(resumed.cart().total_price(), Amount::from_cents(500000));
            assert_eq!(resumed.draft().date, Some(monday()));
            assert_eq!(resumed.draft().barber_id.as_deref(), Some("b-1"));
            // Chosen slot is never restored; availability must be re-checked.
            assert_eq!(resumed.draft().time_slot, None);
            assert_eq!(resumed.slot_stage(), SlotStage::SlotsLoading);
        }
    }

    #[tokio::test]
    async fn stale_draft_date_is_dropped_on_restore() {
        let store = MemoryDraftStore::new();
        let api = ScriptedApi::default();
        let mut s = Session::starting_on(api, store, ClientConfig::default(), monday());
        s.add_service(&service("a", "2500", "45"), 1).unwrap();
        s.select_date(monday()).unwrap();
        s.select_barber("b-1");
        s.save_draft().unwrap();

        // The draft ages a week past its date.
        let later = monday().checked_add_days(chrono::Days::new(7)).unwrap();
        let Session { drafts, .. } = s;
        let mut resumed = Session::starting_on(
            ScriptedApi::default(),
            drafts,
            ClientConfig::default(),
            later,
        );
        assert!(resumed.restore_draft().unwrap());

        // Lines survive; the dead date and everything after it do not.
        assert_eq!(resumed.cart().line_count(), 1);
        assert_eq!(resumed.draft().date, None);
        assert_eq!(resumed.draft().barber_id, None);
        assert_eq!(resumed.slot_stage(), SlotStage::NoDate);
    }

    #[tokio::test]
    async fn closeout_preview_and_close() {
        let api = ScriptedApi::with_shift(1000);
        let s = session(api);

        let mut preview = s.closeout_preview().await.unwrap();
        assert_eq!(preview.delta(Tender::Cash), None);

        preview.enter(Tender::Cash, Amount::from_major(950));
        let delta = preview.delta(Tender::Cash).unwrap();
        assert_eq!(delta.amount, Amount::from_major(50));

        let closed = s.close_shift(&preview, Some("short till".into())).await.unwrap();
        assert_eq!(closed.counted.cash, Amount::from_major(950));
        assert_eq!(closed.difference.cash, Amount::from_major(-50));
        assert_eq!(closed.notes.as_deref(), Some("short till"));

        // The shift is gone; a new preview has nothing to preview.
        let err = s.closeout_preview().await.unwrap_err();
        assert!(matches!(err, ClientError::NoOpenShift));
    }

    #[tokio::test]
    async fn close_rejects_negative_counted_amounts() {
        let api = ScriptedApi::with_shift(1000);
        let s = session(api);

        let mut preview = s.closeout_preview().await.unwrap();
        preview.enter(Tender::Cash, Amount::from_major(-10));
        let err = s.close_shift(&preview, None).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        // Still open: the bad close never reached the service.
        assert!(s.active_shift().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn payment_amount_must_be_positive() {
        let api = ScriptedApi::with_shift(0);
        let mut s = session(api);

        let err = s
            .register_payment("bk-1", Amount::zero(), Tender::Cash)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let outcome = s
            .register_payment("bk-1", Amount::from_major(100), Tender::Transfer)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            GuardOutcome::Executed(IntentOutcome::PaymentRegistered(_))
        ));
    }

    #[tokio::test]
    async fn movement_flows_through_guard() {
        let api = ScriptedApi::default(); // no shift
        let mut s = session(api);

        let outcome = s
            .record_movement(
                MovementKind::Expense,
                Amount::from_major(50),
                Tender::Cash,
                MovementCategory::Expenses,
                "towels",
            )
            .await
            .unwrap();
        assert!(matches!(outcome, GuardOutcome::ShiftRequired));

        let resume = s.open_shift(Amount::from_major(200)).await.unwrap();
        assert!(matches!(
            resume.resumed,
            Some(IntentOutcome::MovementRecorded(_))
        ));
    }
}
