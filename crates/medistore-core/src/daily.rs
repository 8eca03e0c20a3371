//! # Daily Grouping
//!
//! Buckets a recent-sales page by calendar day for the grouped listing,
//! and summarizes a single day for the end-of-day report.
//!
//! ## Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  2024-02-02   ← newest day first                                       │
//! │    ├── 17:40  ← newest created_at first within the day                 │
//! │    └── 08:05                                                            │
//! │  2024-02-01                                                             │
//! │    ├── 15:00                                                            │
//! │    ├── 09:00                                                            │
//! │    └── (no timestamp at all → last, input order kept)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The day key is `sale_date`, else the UTC date of `created_at`, else the
//! processing date. Two sales with the same `sale_date` always share a
//! group whatever their `created_at`.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DayGroup, SaleRecord, SalesTotals};
use crate::MISSING_NAME_PLACEHOLDER;

/// Largest page the recent listing will ask the repository for.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Groups sales by day using today's UTC date for undated sales.
pub fn group_by_date(sales: &[SaleRecord]) -> Vec<DayGroup> {
    group_by_date_on(sales, Utc::now().date_naive())
}

/// Groups sales by day, newest day first, newest activity first per day.
///
/// `today` is the processing date used for sales with no usable date.
/// Every input record appears in exactly one group.
pub fn group_by_date_on(sales: &[SaleRecord], today: NaiveDate) -> Vec<DayGroup> {
    let mut days: BTreeMap<NaiveDate, Vec<SaleRecord>> = BTreeMap::new();
    for sale in sales {
        days.entry(sale.attributed_date(today))
            .or_default()
            .push(sale.clone());
    }

    days.into_iter()
        .rev()
        .map(|(date, mut sales)| {
            // Option orders None first, so reversing puts undated sales last.
            sales.sort_by(|a, b| b.activity_time().cmp(&a.activity_time()));
            DayGroup { date, sales }
        })
        .collect()
}

impl DayGroup {
    /// Product name for a row of the daily listing (`"—"` when missing).
    pub fn display_name(sale: &SaleRecord) -> String {
        sale.product_name_or(MISSING_NAME_PLACEHOLDER)
    }
}

/// Checks a requested page size for the recent listing.
///
/// ## Example
/// ```rust
/// use medistore_core::daily::validate_page_size;
///
/// assert_eq!(validate_page_size(50), Ok(50));
/// assert!(validate_page_size(0).is_err());
/// ```
pub fn validate_page_size(limit: u32) -> CoreResult<u32> {
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(CoreError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: i64::from(MAX_PAGE_SIZE),
        });
    }
    Ok(limit)
}

// =============================================================================
// Day Summary
// =============================================================================

/// End-of-day figures for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DaySummary {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub sale_count: u32,
    pub total_quantity: i64,
    pub total_revenue: Money,
}

/// Summarizes the sales attributed to `date`.
///
/// Undated sales count towards `today`, same as in the grouped listing.
pub fn summarize_day(sales: &[SaleRecord], date: NaiveDate, today: NaiveDate) -> DaySummary {
    let day_sales: Vec<&SaleRecord> = sales
        .iter()
        .filter(|sale| sale.attributed_date(today) == date)
        .collect();

    let totals = SalesTotals::from_records(day_sales.iter().copied());
    DaySummary {
        date,
        sale_count: u32::try_from(day_sales.len()).unwrap_or(u32::MAX),
        total_quantity: totals.total_quantity,
        total_revenue: totals.total_revenue,
    }
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

    fn ids(group: &DayGroup) -> Vec<&str> {
        group.sales.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_same_day_newest_first() {
        let sales = records(json!([
            {"id": "morning", "sale_date": "2024-02-01", "created_at": "2024-02-01T09:00:00Z"},
            {"id": "afternoon", "sale_date": "2024-02-01", "created_at": "2024-02-01T15:00:00Z"}
        ]));

        let groups = group_by_date_on(&sales, date(2024, 3, 1));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key(), "2024-02-01");
        assert_eq!(ids(&groups[0]), vec!["afternoon", "morning"]);
    }

    #[test]
    fn test_sale_date_wins_over_created_at_for_bucketing() {
        let sales = records(json!([
            {"id": "a", "sale_date": "2024-02-01", "created_at": "2024-02-03T09:00:00Z"},
            {"id": "b", "sale_date": "2024-02-01", "created_at": "2024-01-30T23:00:00Z"}
        ]));

        let groups = group_by_date_on(&sales, date(2024, 3, 1));
        assert_eq!(groups.len(), 1);
        assert_eq!(ids(&groups[0]), vec!["a", "b"]);
    }

    #[test]
    fn test_days_newest_first_and_fallbacks() {
        let sales = records(json!([
            {"id": "old", "sale_date": "2024-01-15"},
            {"id": "created-only", "created_at": "2024-02-10T08:00:00Z"},
            {"id": "undated", "sale_date": "garbage"},
            {"id": "mid", "sale_date": "2024-02-01"}
        ]));

        let today = date(2024, 3, 1);
        let groups = group_by_date_on(&sales, today);
        let keys: Vec<String> = groups.iter().map(DayGroup::key).collect();

        assert_eq!(keys, vec!["2024-03-01", "2024-02-10", "2024-02-01", "2024-01-15"]);
        assert_eq!(ids(&groups[0]), vec!["undated"]);
        assert!(groups.windows(2).all(|w| w[0].date > w[1].date));
    }

    #[test]
    fn test_undated_sorts_last_within_day() {
        let sales = records(json!([
            {"id": "no-time-1"},
            {"id": "timed", "created_at": "2024-03-01T10:00:00Z"},
            {"id": "no-time-2"}
        ]));

        let groups = group_by_date_on(&sales, date(2024, 3, 1));
        assert_eq!(ids(&groups[0]), vec!["timed", "no-time-1", "no-time-2"]);
    }

    #[test]
    fn test_record_count_conserved() {
        let sales = records(json!([
            {"id": "1", "sale_date": "2024-02-01", "quantity": 2, "price_at_sale": "1.00"},
            {"id": "2", "sale_date": "2024-02-02", "quantity": "abc", "price_at_sale": null},
            {"id": "3", "created_at": "2024-02-02T10:00:00Z", "quantity": 5, "price_at_sale": 3},
            {"id": "4"}
        ]));

        let groups = group_by_date_on(&sales, date(2024, 3, 1));
        let count: usize = groups.iter().map(|g| g.sales.len()).sum();
        assert_eq!(count, sales.len());

        let quantity: i64 = groups.iter().map(|g| g.totals().total_quantity).sum();
        let revenue: Money = groups.iter().map(|g| g.totals().total_revenue).sum();
        assert_eq!(quantity, 7);
        assert_eq!(revenue.cents(), 200 + 1500);
    }

    #[test]
    fn test_display_name_placeholder() {
        let sales = records(json!([{"id": "1"}, {"id": "2", "products": [{"name": "Flagyl"}]}]));
        assert_eq!(DayGroup::display_name(&sales[0]), "\u{2014}");
        assert_eq!(DayGroup::display_name(&sales[1]), "Flagyl");
    }

    #[test]
    fn test_page_size_bounds() {
        assert_eq!(validate_page_size(1), Ok(1));
        assert_eq!(validate_page_size(MAX_PAGE_SIZE), Ok(MAX_PAGE_SIZE));
        assert!(validate_page_size(MAX_PAGE_SIZE + 1).is_err());
    }

    #[test]
    fn test_summarize_day() {
        let sales = records(json!([
            {"id": "1", "sale_date": "2024-02-01", "quantity": 2, "price_at_sale": "10.00"},
            {"id": "2", "sale_date": "2024-02-01", "quantity": 1, "price_at_sale": "4.50"},
            {"id": "3", "sale_date": "2024-02-02", "quantity": 9, "price_at_sale": "1.00"},
            {"id": "4", "quantity": 1, "price_at_sale": "1.00"}
        ]));

        let summary = summarize_day(&sales, date(2024, 2, 1), date(2024, 3, 1));
        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.total_quantity, 3);
        assert_eq!(summary.total_revenue.cents(), 2450);

        let today = summarize_day(&sales, date(2024, 3, 1), date(2024, 3, 1));
        assert_eq!(today.sale_count, 1);

        let empty = summarize_day(&sales, date(2020, 1, 1), date(2024, 3, 1));
        assert_eq!(empty.sale_count, 0);
        assert!(empty.total_revenue.is_zero());
    }
}
