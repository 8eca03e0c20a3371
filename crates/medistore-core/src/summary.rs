//! # Period Summaries
//!
//! Figures over a span of days rather than a single one: the reports page
//! summary card for a date range, and the dashboard's revenue-per-day
//! chart.
//!
//! ```text
//!   summarize_range(sales, 2024-01-01, 2024-01-31)
//!       ──► { total_sales, total_items_sold, total_revenue }
//!
//!   daily_revenue_series(sales, today = 2024-02-07, days = 7)
//!       ──► 02-01  02-02  02-03  02-04  02-05  02-06  02-07   (oldest first,
//!           12.00   0.00  40.50   0.00   0.00   9.99  88.00    gaps are zero)
//! ```
//!
//! Sales are placed on their attributed date, exactly as in the grouped
//! listing and the weekly report, so every view agrees on which day a sale
//! belongs to.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{SaleRecord, SalesTotals};

/// Default length of the revenue chart, in days.
pub const DEFAULT_SERIES_DAYS: u32 = 7;

/// Longest revenue series that will be built.
pub const MAX_SERIES_DAYS: u32 = 366;

// =============================================================================
// Range Summary
// =============================================================================

/// Totals over an inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RangeSummary {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
    /// Number of sale records in the range.
    pub total_sales: u32,
    pub total_items_sold: i64,
    pub total_revenue: Money,
}

/// Summarizes the sales attributed to `start..=end`.
///
/// Undated sales count towards `today`. A range that ends before it starts
/// is an error.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use medistore_core::{summary::summarize_range, SaleRecord};
///
/// let sales: Vec<SaleRecord> = serde_json::from_str(r#"[
///     {"quantity": 2, "price_at_sale": "10.00", "sale_date": "2024-01-08"},
///     {"quantity": 1, "price_at_sale": "5.00", "sale_date": "2024-02-08"}
/// ]"#).unwrap();
///
/// let jan = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let summary = summarize_range(&sales, jan(1), jan(31), jan(31)).unwrap();
/// assert_eq!(summary.total_sales, 1);
/// assert_eq!(summary.total_revenue.to_plain_string(), "20.00");
/// ```
pub fn summarize_range(
    sales: &[SaleRecord],
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> CoreResult<RangeSummary> {
    if start > end {
        return Err(CoreError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let in_range: Vec<&SaleRecord> = sales
        .iter()
        .filter(|sale| (start..=end).contains(&sale.attributed_date(today)))
        .collect();

    let totals = SalesTotals::from_records(in_range.iter().copied());
    Ok(RangeSummary {
        start,
        end,
        total_sales: u32::try_from(in_range.len()).unwrap_or(u32::MAX),
        total_items_sold: totals.total_quantity,
        total_revenue: totals.total_revenue,
    })
}

// =============================================================================
// Revenue Series
// =============================================================================

/// Revenue of one day in the chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyRevenue {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub revenue: Money,
    pub sale_count: u32,
}

/// Revenue for each of the last `days` days up to and including `today`,
/// oldest first. Days without sales are present with zero revenue.
///
/// `days` is clamped to [`MAX_SERIES_DAYS`]; zero gives an empty series.
pub fn daily_revenue_series(sales: &[SaleRecord], today: NaiveDate, days: u32) -> Vec<DailyRevenue> {
    let days = days.min(MAX_SERIES_DAYS);
    let mut series: BTreeMap<NaiveDate, DailyRevenue> = (0..days)
        .filter_map(|back| today.checked_sub_signed(TimeDelta::days(i64::from(back))))
        .map(|date| {
            let day = DailyRevenue {
                date,
                revenue: Money::zero(),
                sale_count: 0,
            };
            (date, day)
        })
        .collect();

    for sale in sales {
        if let Some(day) = series.get_mut(&sale.attributed_date(today)) {
            day.revenue += sale.line_total();
            day.sale_count = day.sale_count.saturating_add(1);
        }
    }

    series.into_values().collect()
}

/// Checks a requested series length.
pub fn validate_series_days(days: u32) -> CoreResult<u32> {
    if days == 0 || days > MAX_SERIES_DAYS {
        return Err(CoreError::OutOfRange {
            field: "days".to_string(),
            min: 1,
            max: i64::from(MAX_SERIES_DAYS),
        });
    }
    Ok(days)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<SaleRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sales() -> Vec<SaleRecord> {
        records(json!([
            {"id": "1", "quantity": 2, "price_at_sale": "10.00", "sale_date": "2024-02-01"},
            {"id": "2", "quantity": "3", "price_at_sale": "1.50", "sale_date": "2024-02-03"},
            {"id": "3", "quantity": "abc", "price_at_sale": null, "sale_date": "2024-02-03"},
            {"id": "4", "quantity": 1, "price_at_sale": 99, "created_at": "2024-02-07T21:00:00Z"},
            {"id": "5", "quantity": 4, "price_at_sale": "2.00"},
            {"id": "6", "quantity": 8, "price_at_sale": "1.00", "sale_date": "2024-01-31"}
        ]))
    }

    #[test]
    fn test_summarize_range_inclusive_bounds() {
        let summary = summarize_range(&sales(), date(2024, 2, 1), date(2024, 2, 7), date(2024, 3, 1)).unwrap();

        assert_eq!(summary.total_sales, 4);
        assert_eq!(summary.total_items_sold, 6);
        assert_eq!(summary.total_revenue.cents(), 2000 + 450 + 9900);
    }

    #[test]
    fn test_summarize_range_counts_undated_on_today() {
        let today = date(2024, 2, 7);
        let summary = summarize_range(&sales(), today, today, today).unwrap();

        assert_eq!(summary.total_sales, 2);
        assert_eq!(summary.total_items_sold, 5);
        assert_eq!(summary.total_revenue.cents(), 9900 + 800);
    }

    #[test]
    fn test_summarize_range_rejects_inverted_range() {
        let err = summarize_range(&sales(), date(2024, 2, 7), date(2024, 2, 1), date(2024, 3, 1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRange { .. }));
    }

    #[test]
    fn test_empty_range_is_all_zero() {
        let summary = summarize_range(&[], date(2024, 1, 1), date(2024, 1, 31), date(2024, 3, 1)).unwrap();
        assert_eq!(summary.total_sales, 0);
        assert_eq!(summary.total_items_sold, 0);
        assert!(summary.total_revenue.is_zero());
    }

    #[test]
    fn test_daily_revenue_series_fills_gaps() {
        let series = daily_revenue_series(&sales(), date(2024, 2, 7), 7);

        let dates: Vec<String> = series.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(
            dates,
            vec!["2024-02-01", "2024-02-02", "2024-02-03", "2024-02-04", "2024-02-05", "2024-02-06", "2024-02-07"]
        );

        let cents: Vec<i64> = series.iter().map(|d| d.revenue.cents()).collect();
        assert_eq!(cents, vec![2000, 0, 450, 0, 0, 0, 9900 + 800]);
        assert_eq!(series[2].sale_count, 2);
        assert_eq!(series[6].sale_count, 2);
    }

    #[test]
    fn test_daily_revenue_series_lengths() {
        assert!(daily_revenue_series(&sales(), date(2024, 2, 7), 0).is_empty());
        assert_eq!(daily_revenue_series(&[], date(2024, 2, 7), 1).len(), 1);
        assert_eq!(
            daily_revenue_series(&[], date(2024, 2, 7), u32::MAX).len(),
            MAX_SERIES_DAYS as usize
        );
    }

    #[test]
    fn test_validate_series_days() {
        assert_eq!(validate_series_days(DEFAULT_SERIES_DAYS), Ok(7));
        assert!(validate_series_days(0).is_err());
        assert!(validate_series_days(MAX_SERIES_DAYS + 1).is_err());
    }
}
