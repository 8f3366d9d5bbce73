//! # Client Configuration
//!
//! Configuration for the booking and till client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     RESERVA_WINDOW_DAYS=14                                              │
//! │     RESERVA_CLOSED_WEEKDAY=Mon                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/reserva/client.toml (Linux)                               │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     Sundays closed, 30-day window, business-hours fallback slots        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [booking]
//! closed_weekday = "Sun"
//! window_days = 30
//! default_duration_min = 60
//!
//! [till]
//! fallback_slots = ["09:00", "10:00", "11:00", "12:00",
//!                   "17:00", "18:00", "19:00", "20:00", "21:00"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use reserva_core::validation::BookingRules;
use reserva_core::Minutes;

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading/saving failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a config directory for this platform")]
    NoConfigDir,

    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// =============================================================================
// Sections
// =============================================================================

/// Booking-rule settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingSettings {
    /// Weekday on which no bookings are accepted.
    #[serde(default = "default_closed_weekday")]
    pub closed_weekday: chrono::Weekday,

    /// Days ahead of today that remain bookable.
    #[serde(default = "default_window_days")]
    pub window_days: u64,

    /// Slot duration requested when the cart somehow carries no minutes.
    #[serde(default = "default_duration_min")]
    pub default_duration_min: i64,
}

fn default_closed_weekday() -> chrono::Weekday {
    chrono::Weekday::Sun
}

fn default_window_days() -> u64 {
    30
}

fn default_duration_min() -> i64 {
    reserva_core::DEFAULT_SERVICE_MINUTES
}

impl BookingSettings {
    /// The pure-core rule set derived from these settings.
    pub fn rules(&self) -> BookingRules {
        BookingRules {
            closed_weekday: self.closed_weekday,
            window_days: self.window_days,
        }
    }

    pub fn default_duration(&self) -> Minutes {
        Minutes::new(self.default_duration_min)
    }
}

impl Default for BookingSettings {
    fn default() -> Self {
        BookingSettings {
            closed_weekday: default_closed_weekday(),
            window_days: default_window_days(),
            default_duration_min: default_duration_min(),
        }
    }
}

/// Till / slot-workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TillSettings {
    /// Business-hour template shown when the scheduler is unreachable.
    /// All entries are offered as available; the service re-validates at
    /// confirmation time.
    #[serde(default = "default_fallback_slots")]
    pub fallback_slots: Vec<String>,
}

fn default_fallback_slots() -> Vec<String> {
    [
        "09:00", "10:00", "11:00", "12:00", "17:00", "18:00", "19:00", "20:00", "21:00",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

impl Default for TillSettings {
    fn default() -> Self {
        TillSettings {
            fallback_slots: default_fallback_slots(),
        }
    }
}

// =============================================================================
// Client Config
// =============================================================================

/// Full client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default)]
    pub booking: BookingSettings,

    #[serde(default)]
    pub till: TillSettings,
}

impl ClientConfig {
    /// Loads configuration: file, then env overrides, then defaults.
    ///
    /// A missing file is normal (first run). A malformed file logs a
    /// warning and falls back to defaults rather than refusing to start;
    /// the till must stay usable on a bad edit.
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(err) => {
                warn!(%err, "no config directory, using defaults");
                ClientConfig::default()
            }
        };
        config.apply_env_overrides();
        config
    }

    /// Loads from an explicit path, falling back to defaults on any failure.
    pub fn load_from(path: &PathBuf) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded client config");
                    config
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "malformed config, using defaults");
                    ClientConfig::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                ClientConfig::default()
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "config unreadable, using defaults");
                ClientConfig::default()
            }
        }
    }

    /// Persists the configuration to the platform config dir.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        debug!(path = %path.display(), "saved client config");
        Ok(())
    }

    /// `<platform config dir>/reserva/client.toml`.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dirs = directories::ProjectDirs::from("com", "clase-v", "reserva")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("client.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var("RESERVA_WINDOW_DAYS") {
            match raw.parse::<u64>() {
                Ok(days) => self.booking.window_days = days,
                Err(_) => warn!(value = %raw, "ignoring bad RESERVA_WINDOW_DAYS"),
            }
        }
        if let Ok(raw) = std::env::var("RESERVA_CLOSED_WEEKDAY") {
            match chrono::Weekday::from_str(&raw) {
                Ok(day) => self.booking.closed_weekday = day,
                Err(_) => warn!(value = %raw, "ignoring bad RESERVA_CLOSED_WEEKDAY"),
            }
        }
        if let Ok(raw) = std::env::var("RESERVA_DEFAULT_DURATION_MIN") {
            match raw.parse::<i64>() {
                Ok(min) if min > 0 => self.booking.default_duration_min = min,
                _ => warn!(value = %raw, "ignoring bad RESERVA_DEFAULT_DURATION_MIN"),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn defaults_match_shop_policy() {
        let config = ClientConfig::default();
        assert_eq!(config.booking.closed_weekday, Weekday::Sun);
        assert_eq!(config.booking.window_days, 30);
        assert_eq!(config.booking.default_duration_min, 60);
        assert_eq!(config.till.fallback_slots.len(), 9);
        assert_eq!(config.till.fallback_slots[0], "09:00");
        assert_eq!(config.till.fallback_slots[8], "21:00");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [booking]
            window_days = 14
            "#,
        )
        .unwrap();
        assert_eq!(config.booking.window_days, 14);
        assert_eq!(config.booking.closed_weekday, Weekday::Sun);
        assert_eq!(config.till.fallback_slots.len(), 9);
    }

    #[test]
    fn roundtrips_through_toml() {
        let config = ClientConfig::default();
        let raw = toml::to_string_pretty(&config).unwrap();
        let back: ClientConfig = toml::from_str(&raw).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn rules_projection() {
        let config = ClientConfig::default();
        let rules = config.booking.rules();
        assert_eq!(rules.closed_weekday, Weekday::Sun);
        assert_eq!(rules.window_days, 30);
    }
}
