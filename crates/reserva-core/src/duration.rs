//! # Duration Module
//!
//! Service durations in whole minutes, with the same tolerant parsing
//! discipline as [`crate::money`]: the catalog stores durations as
//! operator-entered text ("45 min", "1h 30m", sometimes just "45"), and a
//! value that cannot be understood defaults to the standard appointment
//! length instead of failing.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

/// Standard appointment length applied when a duration is absent or
/// unreadable.
pub const DEFAULT_SERVICE_MINUTES: i64 = 60;

// =============================================================================
// Minutes Type
// =============================================================================

/// A non-negative duration in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Minutes(i64);

impl Minutes {
    /// Creates a duration from a minute count. Negative input clamps to zero.
    #[inline]
    pub const fn new(minutes: i64) -> Self {
        if minutes < 0 {
            Minutes(0)
        } else {
            Minutes(minutes)
        }
    }

    /// Zero duration.
    #[inline]
    pub const fn zero() -> Self {
        Minutes(0)
    }

    /// Returns the raw minute count.
    #[inline]
    pub const fn minutes(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies the duration by a line quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Minutes(self.0 * qty)
    }

    /// Parses catalog duration text. Total: never fails.
    ///
    /// See [`parse_duration`] for the grammar.
    pub fn parse(input: &str) -> Self {
        parse_duration(input)
    }
}

/// The default is the standard appointment length, not zero: an absent
/// duration still occupies a real slot.
impl Default for Minutes {
    fn default() -> Self {
        Minutes(DEFAULT_SERVICE_MINUTES)
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0)
    }
}

impl Add for Minutes {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Minutes(self.0 + other.0)
    }
}

impl AddAssign for Minutes {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Mul<i64> for Minutes {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Minutes(self.0 * qty)
    }
}

impl std::iter::Sum for Minutes {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Minutes::zero(), Add::add)
    }
}

// =============================================================================
// Tolerant Parsing
// =============================================================================

/// Parses heterogeneous duration text into canonical [`Minutes`].
///
/// ## Grammar
/// - A pure-digit string is a minute count ("45" → 45).
/// - "`<n>` min" or "`<n>`m" is a minute count ("45 min" → 45).
/// - A string containing "`<h>`h" and/or "`<m>`m" sums hours and minutes
///   ("1h 30m" → 90, "2h" → 120).
/// - Anything else is the standard appointment length (60).
///
/// ## Example
/// ```rust
/// use reserva_core::duration::{parse_duration, Minutes};
///
/// assert_eq!(parse_duration("1h 30m"), Minutes::new(90));
/// assert_eq!(parse_duration("45 min"), Minutes::new(45));
/// assert_eq!(parse_duration("corte largo"), Minutes::new(60));
/// ```
pub fn parse_duration(input: &str) -> Minutes {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return Minutes::default();
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().map_or_else(|_| Minutes::default(), Minutes::new);
    }

    // "<n> min" / "<n>m"
    if let Some(head) = s.strip_suffix("min").or_else(|| s.strip_suffix('m')) {
        let head = head.trim_end();
        if !head.is_empty() && head.bytes().all(|b| b.is_ascii_digit()) {
            return head.parse().map_or_else(|_| Minutes::default(), Minutes::new);
        }
    }

    // "<h>h 30m", "2h", "90 minutos"
    let hours = number_before(&s, 'h');
    let minutes = number_before(&s, 'm');
    if hours.is_some() || minutes.is_some() {
        return Minutes::new(hours.unwrap_or(0) * 60 + minutes.unwrap_or(0));
    }

    Minutes::default()
}

/// Finds the digit run immediately preceding the first `marker` character,
/// skipping interior whitespace ("1 h" → 1). None when there is no marker or
/// no adjacent digits.
fn number_before(s: &str, marker: char) -> Option<i64> {
    let idx = s.find(marker)?;
    let head = s[..idx].trim_end();
    let tail_digits = head
        .bytes()
        .rev()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if tail_digits == 0 {
        return None;
    }
    head[head.len() - tail_digits..].parse().ok()
}

/// Field-level deserializer accepting whatever the catalog API sends for a
/// duration: a JSON number of minutes, a grammar string, or null.
pub fn de_lenient_minutes<'de, D>(deserializer: D) -> Result<Minutes, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientMinutes;

    impl<'de> Visitor<'de> for LenientMinutes {
        type Value = Minutes;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a duration as number, string or null")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Minutes, E> {
            // Negative minute counts are as unreadable as text garbage.
            Ok(if v < 0 { Minutes::default() } else { Minutes::new(v) })
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Minutes, E> {
            Ok(Minutes::new(i64::try_from(v).unwrap_or(DEFAULT_SERVICE_MINUTES)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Minutes, E> {
            if v.is_finite() && v >= 0.0 && v <= i64::MAX as f64 {
                Ok(Minutes::new(v.round() as i64))
            } else {
                Ok(Minutes::default())
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Minutes, E> {
            Ok(parse_duration(v))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Minutes, E> {
            Ok(Minutes::default())
        }

        fn visit_none<E: de::Error>(self) -> Result<Minutes, E> {
            Ok(Minutes::default())
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Minutes, D2::Error> {
            d.deserialize_any(LenientMinutes)
        }
    }

    deserializer.deserialize_any(LenientMinutes)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_digits_are_minutes() {
        assert_eq!(parse_duration("45"), Minutes::new(45));
        assert_eq!(parse_duration("120"), Minutes::new(120));
    }

    #[test]
    fn minute_suffix_forms() {
        assert_eq!(parse_duration("45 min"), Minutes::new(45));
        assert_eq!(parse_duration("45min"), Minutes::new(45));
        assert_eq!(parse_duration("45m"), Minutes::new(45));
        assert_eq!(parse_duration("45 M"), Minutes::new(45));
    }

    #[test]
    fn hour_minute_combinations() {
        assert_eq!(parse_duration("1h 30m"), Minutes::new(90));
        assert_eq!(parse_duration("2h"), Minutes::new(120));
        assert_eq!(parse_duration("1 h 15 m"), Minutes::new(75));
        assert_eq!(parse_duration("90 minutos"), Minutes::new(90));
    }

    #[test]
    fn unreadable_input_defaults_to_sixty() {
        assert_eq!(parse_duration(""), Minutes::new(60));
        assert_eq!(parse_duration("corte largo"), Minutes::new(60));
        assert_eq!(parse_duration("h"), Minutes::new(60));
        assert_eq!(parse_duration("abc"), Minutes::new(60));
    }

    #[test]
    fn arithmetic() {
        let total: Minutes = [Minutes::new(45), Minutes::new(30) * 2].into_iter().sum();
        assert_eq!(total, Minutes::new(105));
        assert_eq!(Minutes::new(45).multiply_quantity(2), Minutes::new(90));
    }

    #[test]
    fn lenient_deserializer() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "de_lenient_minutes")]
            duration: Minutes,
        }

        let n: Row = serde_json::from_str(r#"{"duration": 30}"#).unwrap();
        assert_eq!(n.duration, Minutes::new(30));

        let s: Row = serde_json::from_str(r#"{"duration": "1h 30m"}"#).unwrap();
        assert_eq!(s.duration, Minutes::new(90));

        let null: Row = serde_json::from_str(r#"{"duration": null}"#).unwrap();
        assert_eq!(null.duration, Minutes::new(60));

        let missing: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(missing.duration, Minutes::new(60));

        let negative: Row = serde_json::from_str(r#"{"duration": -5}"#).unwrap();
        assert_eq!(negative.duration, Minutes::new(60));
    }
}
