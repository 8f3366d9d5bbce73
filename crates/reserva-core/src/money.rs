//! # Money Module
//!
//! Provides the `Amount` type for handling monetary values safely, plus the
//! tolerant parsing that turns operator-entered price text into canonical
//! amounts.
//!
//! ## Why Integer Amounts?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In the old frontend:                                                   │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    "2.500,00" parses to 250000 centavos, exactly                        │
//! │    Every price, payment and shift total flows through this type         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Total Parsing?
//! Catalog prices arrive as free text in two locale conventions ("2.500,00"
//! es-AR and "2,500.00" en-US), sometimes with currency symbols, sometimes as
//! plain JSON numbers. These values feed live arithmetic in a UI that must
//! never crash on bad data, so parsing has no error path: malformed input
//! normalizes to zero and the operator corrects it on screen.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Amount Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: shift differences and expense movements go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Two-decimal precision**: the canonical display precision; anything
///   finer is rounded half away from zero at the parse boundary
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, Default,
)]
#[ts(export)]
pub struct Amount(i64);

impl Amount {
    /// Creates an Amount from centavos (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use reserva_core::money::Amount;
    ///
    /// let price = Amount::from_cents(250000); // $2500.00
    /// assert_eq!(price.cents(), 250000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Amount(cents)
    }

    /// Creates an Amount from whole currency units.
    ///
    /// Remote payloads carry plain JSON numbers in major units, so `1000`
    /// means $1000.00, never 1000 centavos.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Amount(major * 100)
    }

    /// Creates an Amount from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50, not -$4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Amount(major * 100 - minor)
        } else {
            Amount(major * 100 + minor)
        }
    }

    /// Converts a float to an Amount, rounding half away from zero to
    /// centavos. Non-finite input normalizes to zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Amount::zero();
        }
        let cents = (value * 100.0).round();
        if cents > i64::MAX as f64 || cents < i64::MIN as f64 {
            return Amount::zero();
        }
        Amount(cents as i64)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero amount.
    #[inline]
    pub const fn zero() -> Self {
        Amount(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Multiplies the amount by a line quantity.
    ///
    /// ## Example
    /// ```rust
    /// use reserva_core::money::Amount;
    ///
    /// let unit = Amount::from_cents(100000); // $1000.00
    /// assert_eq!(unit.multiply_quantity(2).cents(), 200000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Amount(self.0 * qty)
    }

    /// Parses operator-entered price text into an Amount. Total: never fails.
    ///
    /// See [`parse_amount`] for the grammar.
    pub fn parse(input: &str) -> Self {
        parse_amount(input)
    }

    /// Formats the amount with es-AR grouping for display ("2.500,00").
    ///
    /// The UI shows prices the way the shop writes them; the `Display` impl
    /// keeps the neutral machine form.
    pub fn format_es_ar(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let major = self.major().abs().to_string();
        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        let offset = major.len() % 3;
        for (i, ch) in major.chars().enumerate() {
            if i > 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        format!("{}{},{:02}", sign, grouped, self.minor())
    }
}

// =============================================================================
// Tolerant Parsing
// =============================================================================

/// Parses heterogeneous price text into a canonical [`Amount`].
///
/// ## Grammar
/// - Everything except digits, `.`, `,` and `-` is stripped first, so
///   currency symbols and whitespace never matter.
/// - If a comma occurs after the last dot, the string is decimal-comma
///   locale: dots are thousands separators, the final comma is the decimal
///   point ("1.234,56" → 1234.56).
/// - Otherwise commas are thousands separators and are stripped
///   ("1,234.56" → 1234.56).
/// - A failed parse yields zero. Negative results are preserved; callers
///   decide whether negatives make sense.
///
/// ## Example
/// ```rust
/// use reserva_core::money::{parse_amount, Amount};
///
/// assert_eq!(parse_amount("$ 2.500,00"), Amount::from_cents(250000));
/// assert_eq!(parse_amount("2,500.00"), Amount::from_cents(250000));
/// assert_eq!(parse_amount("precio a confirmar"), Amount::zero());
/// ```
pub fn parse_amount(input: &str) -> Amount {
    let stripped: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if stripped.is_empty() {
        return Amount::zero();
    }

    let last_comma = stripped.rfind(',');
    let last_dot = stripped.rfind('.');

    let normalized = match (last_comma, last_dot) {
        // Decimal-comma locale: "1.234,56"
        (Some(c), d) if d.map_or(true, |d| c > d) => {
            let without_dots = stripped.replace('.', "");
            // The comma index moved left by however many dots preceded it;
            // rfind on the dot-free string locates it again.
            match without_dots.rfind(',') {
                Some(idx) => {
                    let mut s = without_dots;
                    s.replace_range(idx..=idx, ".");
                    s
                }
                None => without_dots,
            }
        }
        // Decimal-point locale or integer: "1,234.56", "1234"
        _ => stripped.replace(',', ""),
    };

    decimal_to_cents(&normalized).map_or_else(Amount::zero, Amount::from_cents)
}

/// Converts a plain decimal string ("1234.56") to centavos without a float
/// round-trip. Rounds half away from zero on the third fraction digit.
fn decimal_to_cents(input: &str) -> Option<i64> {
    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    if body.is_empty() {
        return None;
    }

    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let whole: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };

    let mut frac = frac_part.bytes().map(|b| i64::from(b - b'0'));
    let tenths = frac.next().unwrap_or(0);
    let hundredths = frac.next().unwrap_or(0);
    let round_up = frac.next().is_some_and(|d| d >= 5);

    let mut cents = whole
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths)?;
    if round_up {
        cents = cents.checked_add(1)?;
    }
    Some(if negative { -cents } else { cents })
}

/// Field-level deserializer accepting whatever the catalog API sends for a
/// price: a JSON number (major units), a locale-formatted string, or null.
///
/// ## Usage
/// ```rust,ignore
/// #[serde(default, deserialize_with = "crate::money::de_lenient_amount")]
/// pub price: Amount,
/// ```
pub fn de_lenient_amount<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientAmount;

    impl<'de> Visitor<'de> for LenientAmount {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a price as number, string or null")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
            Ok(Amount::from_major(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
            Ok(Amount::from_major(i64::try_from(v).unwrap_or(0)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
            Ok(Amount::from_f64(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
            Ok(parse_amount(v))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Amount, E> {
            Ok(Amount::zero())
        }

        fn visit_none<E: de::Error>(self) -> Result<Amount, E> {
            Ok(Amount::zero())
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Amount, D2::Error> {
            d.deserialize_any(LenientAmount)
        }
    }

    deserializer.deserialize_any(LenientAmount)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Neutral machine format for logs and debugging ("2500.00"). UI display
/// goes through [`Amount::format_es_ar`].
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Add for Amount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Amount {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Amount(self.0 * qty)
    }
}

impl Neg for Amount {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Amount(-self.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_comma_locale() {
        assert_eq!(parse_amount("1.234,56"), Amount::from_cents(123456));
        assert_eq!(parse_amount("2.500,00"), Amount::from_cents(250000));
        assert_eq!(parse_amount("$ 1.234,56"), Amount::from_cents(123456));
        assert_eq!(parse_amount("0,50"), Amount::from_cents(50));
    }

    #[test]
    fn parses_decimal_point_locale() {
        assert_eq!(parse_amount("1,234.56"), Amount::from_cents(123456));
        assert_eq!(parse_amount("2,500.00"), Amount::from_cents(250000));
        assert_eq!(parse_amount("1200.75"), Amount::from_cents(120075));
    }

    #[test]
    fn parses_plain_integers() {
        assert_eq!(parse_amount("25"), Amount::from_cents(2500));
        assert_eq!(parse_amount("$25"), Amount::from_cents(2500));
        assert_eq!(parse_amount("1000"), Amount::from_cents(100000));
    }

    #[test]
    fn malformed_input_is_zero() {
        assert_eq!(parse_amount(""), Amount::zero());
        assert_eq!(parse_amount("abc"), Amount::zero());
        assert_eq!(parse_amount("-"), Amount::zero());
        assert_eq!(parse_amount("1,2,3"), Amount::zero());
        assert_eq!(parse_amount("..."), Amount::zero());
    }

    #[test]
    fn negatives_are_preserved_not_clamped() {
        assert_eq!(parse_amount("-500"), Amount::from_cents(-50000));
        assert_eq!(parse_amount("-1.234,50"), Amount::from_cents(-123450));
        assert!(parse_amount("-500").is_negative());
    }

    #[test]
    fn third_fraction_digit_rounds() {
        assert_eq!(parse_amount("10.005"), Amount::from_cents(1001));
        assert_eq!(parse_amount("10.004"), Amount::from_cents(1000));
    }

    #[test]
    fn from_f64_rounds_to_cents() {
        assert_eq!(Amount::from_f64(10.005), Amount::from_cents(1001));
        assert_eq!(Amount::from_f64(-5.5), Amount::from_cents(-550));
        assert_eq!(Amount::from_f64(f64::NAN), Amount::zero());
    }

    #[test]
    fn arithmetic() {
        let a = Amount::from_cents(1000);
        let b = Amount::from_cents(500);
        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);
        let total: Amount = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn display_and_es_ar_format() {
        assert_eq!(Amount::from_cents(250000).to_string(), "2500.00");
        assert_eq!(Amount::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Amount::from_cents(250000).format_es_ar(), "2.500,00");
        assert_eq!(Amount::from_cents(123456789).format_es_ar(), "1.234.567,89");
        assert_eq!(Amount::from_cents(50).format_es_ar(), "0,50");
        assert_eq!(Amount::from_cents(-123456).format_es_ar(), "-1.234,56");
    }

    #[test]
    fn lenient_deserializer_accepts_anything() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "de_lenient_amount")]
            price: Amount,
        }

        let from_number: Row = serde_json::from_str(r#"{"price": 1000}"#).unwrap();
        assert_eq!(from_number.price, Amount::from_cents(100000));

        let from_text: Row = serde_json::from_str(r#"{"price": "2.500,00"}"#).unwrap();
        assert_eq!(from_text.price, Amount::from_cents(250000));

        let from_float: Row = serde_json::from_str(r#"{"price": 10.5}"#).unwrap();
        assert_eq!(from_float.price, Amount::from_cents(1050));

        let from_null: Row = serde_json::from_str(r#"{"price": null}"#).unwrap();
        assert_eq!(from_null.price, Amount::zero());

        let missing: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(missing.price, Amount::zero());
    }
}
