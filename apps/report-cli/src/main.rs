//! # medistore-report
//!
//! Command-line renderer for the MediStore sales reports.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  medistore-report weekly [--json] [--csv PATH]                          │
//! │  medistore-report recent [--limit N] [--json]                           │
//! │  medistore-report top    [--days N] [--limit N] [--json] [--csv PATH]   │
//! │  medistore-report day    [YYYY-MM-DD] [--json]                          │
//! │  medistore-report summary [--from DATE] [--to DATE] [--json]            │
//! │  medistore-report revenue [--days N] [--json]                           │
//! │  medistore-report delete ID                                             │
//! │                                                                         │
//! │  Global: --config PATH, --db PATH                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reports go to stdout; logs go to stderr (`RUST_LOG` to adjust).

mod config;
mod export;
mod render;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use medistore_core::format::parse_day_key;
use medistore_core::ranking::window_start;
use medistore_db::{Database, DbConfig};

use crate::config::ReportConfig;
use crate::render::Renderer;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sales reports for MediStore", long_about = None)]
struct Cli {
    /// Config file (defaults to report.toml in the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// SQLite database file, overrides the config
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Weekly per-product sales summary
    Weekly {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also write the rows as CSV
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },

    /// Most recent sales grouped by day
    Recent {
        /// Number of sales to fetch
        #[arg(short, long)]
        limit: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Best selling products over a trailing window
    Top {
        /// Window length in days
        #[arg(short, long)]
        days: Option<u32>,

        /// Number of products to show
        #[arg(short, long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,

        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
    },

    /// Sales count and revenue for one day (default: today)
    Day {
        /// Day as YYYY-MM-DD
        date: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Sales, items sold and revenue over a date range
    Summary {
        /// First day, YYYY-MM-DD (default: `summary_days` before --to)
        #[arg(long, value_name = "DATE")]
        from: Option<String>,

        /// Last day, YYYY-MM-DD (default: today)
        #[arg(long, value_name = "DATE")]
        to: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Revenue per day, oldest first
    Revenue {
        /// Number of days ending today
        #[arg(short, long)]
        days: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Delete a sale by id
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = ReportConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }
    debug!(?config, "Configuration resolved");

    if let Some(parent) = config.database.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let db = Database::new(
        DbConfig::new(&config.database.path).max_connections(config.database.max_connections),
    )
    .await
    .with_context(|| format!("failed to open database {}", config.database.path.display()))?;

    let result = run(cli.command, &config, &db).await;
    db.close().await;
    result
}

async fn run(command: Command, config: &ReportConfig, db: &Database) -> Result<()> {
    let reports = db.reports();
    let renderer = Renderer::new(&config.store.name, &config.store.currency_symbol);
    let today = Utc::now().date_naive();
    let mut stdout = io::stdout().lock();

    match command {
        Command::Weekly { json, csv } => {
            let report = reports.weekly_report(today).await?;

            if let Some(path) = csv {
                let file = File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                export::write_weekly_csv(&report, file)?;
                if report.is_empty() {
                    warn!(path = %path.display(), "No data to export, wrote header only");
                }
                info!(path = %path.display(), rows = report.rows.len(), "Weekly CSV written");
            }

            if json {
                print_json(&mut stdout, &report)?;
            } else {
                write!(stdout, "{}", renderer.weekly(&report))?;
            }
        }

        Command::Recent { limit, json } => {
            let limit = limit.unwrap_or(config.reports.recent_limit);
            let groups = reports.recent_by_day(limit, today).await?;

            if json {
                print_json(&mut stdout, &groups)?;
            } else {
                write!(stdout, "{}", renderer.recent(&groups))?;
            }
        }

        Command::Top {
            days,
            limit,
            json,
            csv,
        } => {
            let days = days.unwrap_or(config.reports.top_days);
            let limit = limit.unwrap_or(config.reports.top_limit);
            let rankings = reports.top_products(days, limit, today).await?;

            if let Some(path) = csv {
                let file = File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                export::write_top_products_csv(&rankings, file)?;
                if rankings.is_empty() {
                    warn!(path = %path.display(), "No data to export, wrote header only");
                }
                info!(path = %path.display(), rows = rankings.len(), "Top products CSV written");
            }

            if json {
                print_json(&mut stdout, &rankings)?;
            } else {
                write!(stdout, "{}", renderer.top(&rankings, days))?;
            }
        }

        Command::Day { date, json } => {
            let date = match date {
                Some(raw) => parse_day_key(&raw)?,
                None => today,
            };
            let summary = reports.day_summary(date, today).await?;

            if json {
                print_json(&mut stdout, &summary)?;
            } else {
                write!(stdout, "{}", renderer.day(&summary))?;
            }
        }

        Command::Summary { from, to, json } => {
            let end = match to {
                Some(raw) => parse_day_key(&raw)?,
                None => today,
            };
            let start = match from {
                Some(raw) => parse_day_key(&raw)?,
                None => window_start(end, config.reports.summary_days),
            };
            let summary = reports.sales_summary(start, end, today).await?;

            if json {
                print_json(&mut stdout, &summary)?;
            } else {
                write!(stdout, "{}", renderer.summary(&summary))?;
            }
        }

        Command::Revenue { days, json } => {
            let days = days.unwrap_or(config.reports.chart_days);
            let series = reports.revenue_series(days, today).await?;

            if json {
                print_json(&mut stdout, &series)?;
            } else {
                write!(stdout, "{}", renderer.revenue(&series))?;
            }
        }

        Command::Delete { id } => {
            reports.delete_sale(&id).await?;
            writeln!(stdout, "Deleted sale {id}")?;
        }
    }

    stdout.flush()?;
    Ok(())
}

fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=medistore=trace` - Show trace for medistore crates only
/// - Default: INFO, DEBUG for medistore crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,medistore=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
