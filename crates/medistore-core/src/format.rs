//! # Display Formatting
//!
//! String helpers for the report renderers. Nothing here touches the
//! totals themselves; amounts are already exact `Money` by the time they
//! arrive.
//!
//! ```text
//!   Money(123450)          ──► format_currency(_, "PKR") ──► "PKR 1,234.50"
//!   "2024-01-08"           ──► format_day_header          ──► "Monday, January 8, 2024"
//!   2024-02-01T15:00:00Z   ──► format_time                ──► "15:00"
//! ```

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::PLACEHOLDER_GLYPH;

/// Layout of day keys and day arguments.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Formats a plain amount with two fraction digits.
///
/// Non-finite values render as `"—"` rather than `"NaN"`.
///
/// ## Example
/// ```rust
/// use medistore_core::format::format_amount;
///
/// assert_eq!(format_amount(50.0), "50.00");
/// assert_eq!(format_amount(f64::NAN), "\u{2014}");
/// ```
pub fn format_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return PLACEHOLDER_GLYPH.to_string();
    }
    format!("{amount:.2}")
}

/// Formats money with a currency symbol and thousands separators.
///
/// ## Example
/// ```rust
/// use medistore_core::{format::format_currency, Money};
///
/// assert_eq!(format_currency(Money::from_cents(123450), "PKR"), "PKR 1,234.50");
/// assert_eq!(format_currency(Money::from_cents(-99), "Rs."), "Rs. -0.99");
/// ```
pub fn format_currency(amount: Money, symbol: &str) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let major = group_thousands(amount.major().unsigned_abs());
    format!("{symbol} {sign}{major}.{:02}", amount.minor())
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Turns a `YYYY-MM-DD` day key into a long-form header.
///
/// A key that does not parse is returned unchanged.
///
/// ## Example
/// ```rust
/// use medistore_core::format::format_day_header;
///
/// assert_eq!(format_day_header("2024-01-08"), "Monday, January 8, 2024");
/// assert_eq!(format_day_header("someday"), "someday");
/// ```
pub fn format_day_header(key: &str) -> String {
    match NaiveDate::parse_from_str(key, DAY_KEY_FORMAT) {
        Ok(date) => date.format("%A, %B %-d, %Y").to_string(),
        Err(_) => key.to_string(),
    }
}

/// Formats a sale's time of day as `HH:MM` (UTC), `"—"` when unknown.
pub fn format_time(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.format("%H:%M").to_string(),
        None => PLACEHOLDER_GLYPH.to_string(),
    }
}

/// Parses a day argument typed by a user.
///
/// Unlike stored dates this is strict: a bad value is an error, not a
/// silent fallback.
pub fn parse_day_key(raw: &str) -> CoreResult<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DAY_KEY_FORMAT).map_err(|_| CoreError::InvalidDayKey {
        value: raw.to_string(),
    })
}
