//! # reserva-client: Session Workflows for the Booking & Till Client
//!
//! This crate drives one operator session against the remote booking/ledger
//! service: the slot selection workflow, the shift guard in front of every
//! money-affecting action, draft persistence, and client configuration.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      reserva-client                                     │
//! │                                                                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────────────────┐    │
//! │  │  Session    │  │ SlotPicker  │  │ ShiftGuard                   │    │
//! │  │ (session.rs)│  │ (slots.rs)  │  │ (guard.rs)                   │    │
//! │  │             │  │             │  │                              │    │
//! │  │ One per     │  │ Generation- │  │ Parks money intents until    │    │
//! │  │ operator,   │◄─│ tokened     │  │ a shift is open, resumes     │    │
//! │  │ owns all    │  │ requests,   │  │ them exactly once            │    │
//! │  │ state       │  │ offline     │  │                              │    │
//! │  └─────────────┘  │ fallback    │  └──────────────────────────────┘    │
//! │                   └─────────────┘                                       │
//! │                                                                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────────────────┐    │
//! │  │ BookingApi  │  │ DraftStore  │  │ ClientConfig                 │    │
//! │  │ (api.rs)    │  │ (draft.rs)  │  │ (config.rs)                  │    │
//! │  │             │  │             │  │                              │    │
//! │  │ The remote  │  │ Resume the  │  │ TOML + env + defaults        │    │
//! │  │ service as  │  │ draft after │  │ (closed day, window,         │    │
//! │  │ one trait   │  │ navigation  │  │ fallback template)           │    │
//! │  └─────────────┘  └─────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  DEPENDS ON: reserva-core (pure math and types)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//! One logical thread of control per session. The remote calls are the only
//! suspension points; responses that arrive for a superseded request fail
//! the generation check and are discarded, so two calls resolving out of
//! order can never leave stale data on screen.

pub mod api;
pub mod config;
pub mod draft;
pub mod error;
pub mod guard;
pub mod session;
pub mod slots;

pub use api::{ApiError, ApiResult, BookingApi};
pub use config::{BookingSettings, ClientConfig, ConfigError, TillSettings};
pub use draft::{DraftError, DraftResult, DraftStore, FileDraftStore, MemoryDraftStore};
pub use error::{ClientError, ClientResult};
pub use guard::{GuardOutcome, GuardResume, IntentOutcome, MoneyIntent, ShiftGuard};
pub use session::Session;
pub use slots::{SlotPicker, SlotRequest, SlotStage};
