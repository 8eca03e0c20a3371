//! # medistore-core: Pure Sales Reporting Logic for MediStore
//!
//! This crate turns raw sale records into the two report shapes the store
//! front end renders: weekly per-product summaries and day-grouped recent
//! sales. Everything here is a pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       MediStore Reporting Flow                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              medistore-db (SalesRepository)                     │   │
//! │  │        fetch_all_sales() / fetch_recent_sales(50)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Vec<SaleRecord>                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ medistore-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  weekly   │  │   daily   │  │  ranking  │  │  format   │  │   │
//! │  │   │ aggregate │  │ group by  │  │    top    │  │ currency  │  │   │
//! │  │   │ by week   │  │   date    │  │ products  │  │ day header│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ rows / groups                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              Renderer (report CLI, front end tables)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `SaleRecord`, `ProductRef` and the derived report rows
//! - [`lenient`] - Never-failing coercion of quantities, prices and dates
//! - [`money`] - Money type with integer arithmetic
//! - [`weekly`] - Weekly per-product aggregation
//! - [`daily`] - Day-grouped listing and day summaries
//! - [`ranking`] - Top products over a trailing window
//! - [`summary`] - Date-range summary and revenue-per-day series
//! - [`format`] - Display helpers
//! - [`error`] - Domain error types
//!
//! ## Leniency
//!
//! Malformed input never fails a report. Missing or non-numeric quantities
//! and prices count as zero, unresolvable dates fall back through
//! `sale_date → created_at → processing date`, and missing product names
//! become a placeholder.
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use medistore_core::{weekly, SaleRecord};
//!
//! let sales: Vec<SaleRecord> = serde_json::from_str(r#"[
//!     {"id": "s1", "product_id": "p1", "products": {"name": "Aspirin"},
//!      "quantity": 2, "price_at_sale": "10.00", "sale_date": "2024-01-08"},
//!     {"id": "s2", "product_id": "p1", "products": {"name": "Aspirin"},
//!      "quantity": 3, "price_at_sale": "10.00", "sale_date": "2024-01-10"}
//! ]"#).unwrap();
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let rows = weekly::aggregate_weekly_on(&sales, today);
//!
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].week_start.to_string(), "2024-01-08");
//! assert_eq!(rows[0].total_quantity, 5);
//! assert_eq!(rows[0].total_revenue.to_plain_string(), "50.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod daily;
pub mod error;
pub mod format;
pub mod lenient;
pub mod money;
pub mod ranking;
pub mod summary;
pub mod types;
pub mod weekly;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use daily::{group_by_date, group_by_date_on, summarize_day};
pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use ranking::top_products;
pub use summary::{daily_revenue_series, summarize_range};
pub use types::*;
pub use weekly::{aggregate_weekly, aggregate_weekly_on, week_start, WeeklyReport};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Product name shown in the weekly report when the join payload has none.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown";

/// Glyph shown in place of any value that is missing or not displayable.
pub const PLACEHOLDER_GLYPH: &str = "\u{2014}";

/// Product name shown in the daily listing when the join payload has none.
///
/// The weekly and daily views use different placeholders in the store UI
/// and both are kept as-is.
pub const MISSING_NAME_PLACEHOLDER: &str = PLACEHOLDER_GLYPH;

/// Default page size for the recent sales listing.
pub const DEFAULT_RECENT_LIMIT: u32 = 50;

/// Default trailing window (days) for the top products ranking.
pub const DEFAULT_TOP_DAYS: u32 = 30;
