//! # Lenient Input Coercion
//!
//! Sale rows come from a hosted store where columns are loosely typed:
//! quantities arrive as numbers or strings, prices as `"10.00"`, dates in
//! several shapes, and any of them may be null. This module turns those
//! values into typed fields WITHOUT EVER FAILING.
//!
//! ## Coercion Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field           Accepted                        Otherwise              │
//! │  ─────────────   ─────────────────────────────   ──────────────────     │
//! │  quantity        2, 2.7 (→2), "3", " 4 "          0                     │
//! │  price_at_sale   10, 10.5, "10.00"                Money::zero()         │
//! │  sale_date       "2024-01-08", any timestamp      None                  │
//! │  created_at      RFC 3339, "2024-01-08 09:00:00", None                  │
//! │                  "2024-01-08", epoch millis                             │
//! │  product_id      "p1", 42 (→"42")                 None                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Naive timestamps (no offset) are taken as UTC. A date that cannot be
//! parsed is `None`, so the caller's fallback chain takes over.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serializer;
use serde_json::Value;

use crate::money::Money;

/// Naive timestamp layouts seen in exported rows, tried in order.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

// =============================================================================
// Numbers
// =============================================================================

/// Coerces a textual quantity. Fractions truncate toward zero.
///
/// ## Example
/// ```rust
/// use medistore_core::lenient::quantity_from_str;
///
/// assert_eq!(quantity_from_str("3"), 3);
/// assert_eq!(quantity_from_str("2.9"), 2);
/// assert_eq!(quantity_from_str("abc"), 0);
/// ```
pub fn quantity_from_str(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(qty) = raw.parse::<i64>() {
        return qty;
    }
    finite_f64(raw).map(|f| f.trunc() as i64).unwrap_or(0)
}

/// Coerces a JSON quantity value.
pub fn quantity_from_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => quantity_from_str(s),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Coerces a textual unit price.
///
/// ## Example
/// ```rust
/// use medistore_core::lenient::price_from_str;
///
/// assert_eq!(price_from_str("10.00").cents(), 1000);
/// assert!(price_from_str("n/a").is_zero());
/// ```
pub fn price_from_str(raw: &str) -> Money {
    finite_f64(raw.trim()).map(Money::from_decimal).unwrap_or_default()
}

/// Coerces a JSON unit price value.
pub fn price_from_value(value: &Value) -> Money {
    match value {
        Value::Number(n) => n.as_f64().map(Money::from_decimal).unwrap_or_default(),
        Value::String(s) => price_from_str(s),
        _ => Money::zero(),
    }
}

/// Rust's float parser accepts "NaN" and "inf"; neither is a number here.
fn finite_f64(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|f| f.is_finite())
}

// =============================================================================
// Dates
// =============================================================================

/// Parses a calendar date. Full timestamps reduce to their UTC date.
///
/// ## Example
/// ```rust
/// use medistore_core::lenient::parse_calendar_date;
///
/// assert_eq!(parse_calendar_date("2024-01-08").unwrap().to_string(), "2024-01-08");
/// assert_eq!(
///     parse_calendar_date("2024-01-08T23:30:00-02:00").unwrap().to_string(),
///     "2024-01-09"
/// );
/// assert!(parse_calendar_date("last tuesday").is_none());
/// ```
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}

/// Parses a timestamp into UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    // Postgres text output: "2024-01-08 09:00:00+00"
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(ts.with_timezone(&Utc));
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// =============================================================================
// JSON Values
// =============================================================================

/// Coerces a JSON date value. Only strings carry a date.
pub fn calendar_date_from_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_calendar_date(s),
        _ => None,
    }
}

/// Coerces a JSON timestamp value: a string, or epoch milliseconds.
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

/// Coerces a JSON identifier; numbers keep their decimal text.
pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Prices go back out in the same decimal-string shape they came in.
pub(crate) fn ser_price<S: Serializer>(price: &Money, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&price.to_plain_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quantity_coercion() {
        assert_eq!(quantity_from_value(&json!(2)), 2);
        assert_eq!(quantity_from_value(&json!(2.7)), 2);
        assert_eq!(quantity_from_value(&json!("5")), 5);
        assert_eq!(quantity_from_value(&json!(" 7 ")), 7);
        assert_eq!(quantity_from_value(&json!("abc")), 0);
        assert_eq!(quantity_from_value(&json!(null)), 0);
        assert_eq!(quantity_from_value(&json!([1, 2])), 0);
        assert_eq!(quantity_from_str("NaN"), 0);
        assert_eq!(quantity_from_str(""), 0);
    }

    #[test]
    fn test_price_coercion() {
        assert_eq!(price_from_value(&json!("10.00")).cents(), 1000);
        assert_eq!(price_from_value(&json!(10.5)).cents(), 1050);
        assert_eq!(price_from_value(&json!(3)).cents(), 300);
        assert!(price_from_value(&json!(null)).is_zero());
        assert!(price_from_value(&json!({"amount": 1})).is_zero());
        assert!(price_from_str("inf").is_zero());
    }

    #[test]
    fn test_timestamp_shapes() {
        let expected = "2024-02-01T09:00:00Z";
        for raw in [
            "2024-02-01T09:00:00Z",
            "2024-02-01T10:00:00+01:00",
            "2024-02-01 09:00:00",
            "2024-02-01T09:00:00.000",
            "2024-02-01 09:00:00+00",
        ] {
            let ts = parse_timestamp(raw).unwrap_or_else(|| panic!("failed to parse {raw}"));
            assert_eq!(ts.to_rfc3339_opts(chrono::SecondsFormat::Secs, true), expected);
        }

        let midnight = parse_timestamp("2024-02-01").unwrap();
        assert_eq!(midnight.to_rfc3339_opts(chrono::SecondsFormat::Secs, true), "2024-02-01T00:00:00Z");

        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
    }

    #[test]
    fn test_value_coercion() {
        assert_eq!(id_from_value(&json!(42)).as_deref(), Some("42"));
        assert_eq!(id_from_value(&json!({"id": 1})), None);

        assert_eq!(
            calendar_date_from_value(&json!("2024-01-08")),
            NaiveDate::from_ymd_opt(2024, 1, 8)
        );
        assert_eq!(calendar_date_from_value(&json!(20240108)), None);

        let ts = timestamp_from_value(&json!(1_706_772_600_000_i64)).unwrap();
        assert_eq!(ts.to_rfc3339_opts(chrono::SecondsFormat::Secs, true), "2024-02-01T07:30:00Z");
        assert_eq!(timestamp_from_value(&json!(true)), None);
    }

    #[test]
    fn test_calendar_date_from_timestamp_uses_utc_day() {
        let date = parse_calendar_date("2024-01-07T22:00:00-05:00").unwrap();
        assert_eq!(date.to_string(), "2024-01-08");
    }
}
