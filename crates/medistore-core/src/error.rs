//! # Error Types
//!
//! Domain-specific error types for medistore-core.
//!
//! ## Where Errors Can Happen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Sale records (fetched data)   → NEVER fail, coerced by `lenient`      │
//! │  Explicit user input (CLI)     → CoreError                             │
//! │                                                                         │
//! │  medistore-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  report-cli errors (in app)                                            │
//! │  └── ConfigError / ExportError                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregation itself has no error path: a report over bad rows is still a
//! report. Errors only exist where a person typed something we must reject.

use thiserror::Error;

/// Core domain errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A day key was not a `YYYY-MM-DD` calendar date.
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDayKey { value: String },

    /// A date range whose start falls after its end.
    #[error("Invalid range: {start} is after {end}")]
    InvalidRange { start: String, end: String },

    /// A numeric argument was outside its allowed range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
