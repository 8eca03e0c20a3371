//! # Weekly Aggregation
//!
//! Turns a flat list of sales into one row per product per week.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      aggregate_weekly(sales)                            │
//! │                                                                         │
//! │  SaleRecord ──► attributed_date ──► week_start (Monday)                │
//! │      │          sale_date                 │                             │
//! │      │          → created_at              │                             │
//! │      │          → today                   ▼                             │
//! │      │                     key = (week_start, product_id, name)        │
//! │      │                                    │                             │
//! │      └── quantity, line_total ──────────► bucket += (qty, revenue)     │
//! │                                           │                             │
//! │                                           ▼                             │
//! │                         rows sorted by week_start DESC                 │
//! │                         (ties keep first-seen order)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Week Boundary
//! Weeks start on Monday. With Sunday = 0 … Saturday = 6 the offset to the
//! week's Monday is `-6` for Sunday and `1 - day` otherwise, so a Sunday
//! belongs to the week that began the Monday BEFORE it. Downstream reports
//! assume Monday starts; do not swap this for a locale's week start.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{SaleRecord, SalesTotals, WeeklySummaryRow};
use crate::UNKNOWN_PRODUCT_NAME;

/// Returns the Monday of the week containing `date`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use medistore_core::week_start;
///
/// let sunday = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
/// assert_eq!(week_start(sunday).to_string(), "2024-01-08");
///
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert_eq!(week_start(monday).to_string(), "2024-01-15");
/// ```
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let day = i64::from(date.weekday().num_days_from_sunday());
    let offset = if day == 0 { -6 } else { 1 - day };
    date.checked_add_signed(TimeDelta::days(offset)).unwrap_or(date)
}

/// Aggregates sales into weekly per-product rows, using today's UTC date
/// for sales that carry no usable date.
pub fn aggregate_weekly(sales: &[SaleRecord]) -> Vec<WeeklySummaryRow> {
    aggregate_weekly_on(sales, Utc::now().date_naive())
}

/// Aggregates sales into weekly per-product rows.
///
/// `today` is the processing date used for sales without any usable date.
/// Never fails: bad quantities and prices count as zero, a missing product
/// name becomes `"Unknown"`, and sums clamp at the i64 bounds.
pub fn aggregate_weekly_on(sales: &[SaleRecord], today: NaiveDate) -> Vec<WeeklySummaryRow> {
    let mut rows: Vec<WeeklySummaryRow> = Vec::new();
    let mut index: HashMap<(NaiveDate, Option<String>, String), usize> = HashMap::new();

    for sale in sales {
        let week = week_start(sale.attributed_date(today));
        let name = sale.product_name_or(UNKNOWN_PRODUCT_NAME);
        let key = (week, sale.product_id.clone(), name);

        let slot = *index.entry(key).or_insert_with_key(|(week, product_id, name)| {
            rows.push(WeeklySummaryRow {
                week_start: *week,
                product_id: product_id.clone(),
                product_name: name.clone(),
                total_quantity: 0,
                total_revenue: Money::zero(),
            });
            rows.len() - 1
        });

        let row = &mut rows[slot];
        row.total_quantity = row.total_quantity.saturating_add(sale.quantity);
        row.total_revenue += sale.line_total();
    }

    // Stable: rows of the same week stay in first-seen order.
    rows.sort_by(|a, b| b.week_start.cmp(&a.week_start));
    rows
}

// =============================================================================
// Weekly Report
// =============================================================================

/// Quantity and revenue of one whole week, across products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeekTotals {
    #[ts(as = "String")]
    pub week_start: NaiveDate,
    pub total_quantity: i64,
    pub total_revenue: Money,
}

/// The weekly rows plus the subtotals a printed report shows under them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeeklyReport {
    pub rows: Vec<WeeklySummaryRow>,
    /// One entry per week, newest first.
    pub weeks: Vec<WeekTotals>,
    pub totals: SalesTotals,
}

impl WeeklyReport {
    /// Aggregates `sales` and computes the week and grand totals.
    pub fn build(sales: &[SaleRecord], today: NaiveDate) -> Self {
        Self::from_rows(aggregate_weekly_on(sales, today))
    }

    /// Wraps already aggregated rows (sorted newest week first).
    pub fn from_rows(rows: Vec<WeeklySummaryRow>) -> Self {
        let mut weeks: Vec<WeekTotals> = Vec::new();
        for row in &rows {
            match weeks.last_mut() {
                Some(week) if week.week_start == row.week_start => {
                    week.total_quantity = week.total_quantity.saturating_add(row.total_quantity);
                    week.total_revenue += row.total_revenue;
                }
                _ => weeks.push(WeekTotals {
                    week_start: row.week_start,
                    total_quantity: row.total_quantity,
                    total_revenue: row.total_revenue,
                }),
            }
        }

        let totals = SalesTotals::from_rows(&rows);
        WeeklyReport { rows, weeks, totals }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
