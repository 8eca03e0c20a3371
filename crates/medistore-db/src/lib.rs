//! # medistore-db: Database Layer for MediStore
//!
//! Sale history storage for the MediStore reports, on SQLite via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MediStore Data Flow                              │
//! │                                                                         │
//! │  medistore-report weekly                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   medistore-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (sale.rs)    │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SalesRepo     │    │ 001_initial  │  │   │
//! │  │   │               │    │ ProductRepo   │    │  _schema.sql │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ Vec<SaleRecord>               │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │ ReportService │ → medistore-core      │   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - `SalesRepository` trait and SQLite implementations
//! - [`report`] - Fetch-then-shape report service
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medistore_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("medistore.db")).await?;
//! let today = chrono::Utc::now().date_naive();
//!
//! let report = db.reports().weekly_report(today).await?;
//! let days = db.reports().recent_by_day(50, today).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod report;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use report::ReportService;

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::SqliteSalesRepository;
pub use repository::{NewSale, SalesRepository};
