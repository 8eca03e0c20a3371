//! # Repository Module
//!
//! Sales storage behind a narrow async interface.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sales Repository                                     │
//! │                                                                         │
//! │  ReportService<R: SalesRepository>                                     │
//! │       │                                                                 │
//! │       │  repo.fetch_recent_sales(50)                                   │
//! │       ▼                                                                 │
//! │  SalesRepository (trait)                                               │
//! │  ├── fetch_all_sales()          full history, newest sale_date first   │
//! │  ├── fetch_recent_sales(limit)  newest created_at first                │
//! │  ├── delete_sale(id)            NotFound when nothing was deleted      │
//! │  └── insert_sale(&NewSale)      returns the new id                     │
//! │       │                                                                 │
//! │       ├── SqliteSalesRepository   (this crate)                         │
//! │       └── in-memory fakes         (tests)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SalesRepository`] / [`sale::SqliteSalesRepository`] - Sale reads and writes
//! - [`product::ProductRepository`] - Product catalogue rows the sales join against

pub mod product;
pub mod sale;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DbResult;
use medistore_core::{Money, SaleRecord};

/// A sale to be written.
///
/// Unlike [`SaleRecord`] this is strict: it is built by our own code and
/// validated before insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub product_id: Option<String>,
    pub quantity: i64,
    pub price_at_sale: Money,
    pub sale_date: NaiveDate,
    /// Defaults to the insert time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewSale {
    pub fn new(product_id: impl Into<String>, quantity: i64, price_at_sale: Money, sale_date: NaiveDate) -> Self {
        NewSale {
            product_id: Some(product_id.into()),
            quantity,
            price_at_sale,
            sale_date,
            created_at: None,
        }
    }

    /// Pins the creation timestamp.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Source of sale records for the reports.
///
/// Implementations return records in the order documented per method;
/// the core functions re-sort anyway, so the order only matters for
/// paging.
#[async_trait]
pub trait SalesRepository: Send + Sync {
    /// Every sale, newest `sale_date` first.
    async fn fetch_all_sales(&self) -> DbResult<Vec<SaleRecord>>;

    /// The `limit` most recently created sales, newest first.
    async fn fetch_recent_sales(&self, limit: u32) -> DbResult<Vec<SaleRecord>>;

    /// Deletes one sale. Errors with `NotFound` when no row matched.
    async fn delete_sale(&self, id: &str) -> DbResult<()>;

    /// Inserts a sale and returns its generated id.
    async fn insert_sale(&self, sale: &NewSale) -> DbResult<String>;
}
