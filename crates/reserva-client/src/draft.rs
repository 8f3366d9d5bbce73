//! # Draft Persistence
//!
//! The in-progress booking draft survives navigation: the customer picks
//! services, wanders off to the barber page, and comes back to an intact
//! selection. Storage is a small trait so the session can run against an
//! in-memory store in tests and a JSON file on disk in the app.
//!
//! Draft storage is best-effort. A failed save or a corrupt file never
//! blocks the workflow; the worst outcome is re-selecting services.

use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use reserva_core::BookingDraft;

// =============================================================================
// Errors
// =============================================================================

/// Draft persistence failures.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("could not determine a data directory for this platform")]
    NoDataDir,

    #[error("draft I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("draft could not be serialized: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("draft store lock poisoned")]
    Poisoned,
}

/// Convenience alias for Results with DraftError.
pub type DraftResult<T> = Result<T, DraftError>;

// =============================================================================
// Store Trait
// =============================================================================

/// Restart-durable storage for the single in-progress draft.
pub trait DraftStore: Send + Sync {
    /// Persists the draft, replacing any previous one.
    fn save(&self, draft: &BookingDraft) -> DraftResult<()>;

    /// Loads the persisted draft, if any. A corrupt record reads as absent.
    fn load(&self) -> DraftResult<Option<BookingDraft>>;

    /// Discards the persisted draft.
    fn clear(&self) -> DraftResult<()>;
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory store: the session default when durability across restarts is
/// not needed, and the store used throughout the test suite.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    draft: Mutex<Option<BookingDraft>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn save(&self, draft: &BookingDraft) -> DraftResult<()> {
        let mut slot = self.draft.lock().map_err(|_| DraftError::Poisoned)?;
        *slot = Some(draft.clone());
        Ok(())
    }

    fn load(&self) -> DraftResult<Option<BookingDraft>> {
        let slot = self.draft.lock().map_err(|_| DraftError::Poisoned)?;
        Ok(slot.clone())
    }

    fn clear(&self) -> DraftResult<()> {
        let mut slot = self.draft.lock().map_err(|_| DraftError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// JSON-file store under the platform data dir, for the desktop client.
#[derive(Debug)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    /// Store at `<platform data dir>/reserva/draft.json`.
    pub fn new() -> DraftResult<Self> {
        let dirs = directories::ProjectDirs::from("com", "clase-v", "reserva")
            .ok_or(DraftError::NoDataDir)?;
        Ok(FileDraftStore {
            path: dirs.data_dir().join("draft.json"),
        })
    }

    /// Store at an explicit path.
    pub fn with_path(path: PathBuf) -> Self {
        FileDraftStore { path }
    }
}

impl DraftStore for FileDraftStore {
    fn save(&self, draft: &BookingDraft) -> DraftResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(draft)?;
        std::fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), "draft saved");
        Ok(())
    }

    fn load(&self) -> DraftResult<Option<BookingDraft>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(draft) => Ok(Some(draft)),
            Err(err) => {
                // A corrupt draft is not worth blocking the workflow over.
                warn!(path = %self.path.display(), %err, "corrupt draft discarded");
                Ok(None)
            }
        }
    }

    fn clear(&self) -> DraftResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use reserva_core::{Amount, CartLine, Minutes};

    fn draft() -> BookingDraft {
        BookingDraft {
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
        }
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryDraftStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&draft()).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, draft());

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = std::env::temp_dir().join("reserva-draft-test");
        let store = FileDraftStore::with_path(dir.join("draft.json"));
        store.clear().unwrap();

        assert!(store.load().unwrap().is_none());
        store.save(&draft()).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), draft());

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_file_reads_as_absent() {
        let dir = std::env::temp_dir().join("reserva-draft-corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("draft.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileDraftStore::with_path(path);
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn clear_is_noop_when_absent() {
        let store = FileDraftStore::with_path(
            std::env::temp_dir().join("reserva-draft-none/never-written.json"),
        );
        store.clear().unwrap();
    }
}
