//! # Report Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --db ./medistore.db, --limit 20, --days 7                          │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     MEDISTORE_DB_PATH=/srv/medistore/medistore.db                      │
//! │     MEDISTORE_CURRENCY_SYMBOL=Rs.                                      │
//! │                                                                         │
//! │  3. TOML Config File (--config, or the platform config dir)            │
//! │     ~/.config/medistore/report.toml (Linux)                            │
//! │     ~/Library/Application Support/com.medistore.medistore/report.toml  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # report.toml
//! [database]
//! path = "/srv/medistore/medistore.db"
//! max_connections = 5
//!
//! [store]
//! name = "City Pharmacy"
//! currency_symbol = "PKR"
//!
//! [reports]
//! recent_limit = 50
//! top_days = 30
//! top_limit = 10
//! summary_days = 30
//! chart_days = 7
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use medistore_core::summary::DEFAULT_SERIES_DAYS;
use medistore_core::{DEFAULT_RECENT_LIMIT, DEFAULT_TOP_DAYS};

const CONFIG_FILE_NAME: &str = "report.toml";
const DATABASE_FILE_NAME: &str = "medistore.db";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Where the sales database lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "medistore", "medistore")
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// How the store presents itself on printed reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "MediStore".to_string()
}

fn default_currency_symbol() -> String {
    "PKR".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Report sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Sales fetched for the grouped recent listing.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,

    /// Trailing window of the top products ranking, in days.
    #[serde(default = "default_top_days")]
    pub top_days: u32,

    /// Products shown in the ranking.
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,

    /// Days covered by `summary` when no range is given.
    #[serde(default = "default_top_days")]
    pub summary_days: u32,

    /// Length of the revenue-per-day series.
    #[serde(default = "default_chart_days")]
    pub chart_days: u32,
}

fn default_recent_limit() -> u32 {
    DEFAULT_RECENT_LIMIT
}

fn default_top_days() -> u32 {
    DEFAULT_TOP_DAYS
}

fn default_top_limit() -> usize {
    10
}

fn default_chart_days() -> u32 {
    DEFAULT_SERIES_DAYS
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            recent_limit: default_recent_limit(),
            top_days: default_top_days(),
            top_limit: default_top_limit(),
            summary_days: default_top_days(),
            chart_days: default_chart_days(),
        }
    }
}

// =============================================================================
// ReportConfig
// =============================================================================

/// Complete configuration of the report CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub reports: ReportSettings,
}

impl ReportConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (report.toml)
    /// 3. Environment variables
    ///
    /// An explicitly passed path must exist; the default location is
    /// optional.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading report config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path cannot be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.reports.recent_limit == 0 {
            return Err(ConfigError::Invalid(
                "reports.recent_limit must be greater than 0".into(),
            ));
        }

        if self.reports.top_days == 0 {
            return Err(ConfigError::Invalid(
                "reports.top_days must be greater than 0".into(),
            ));
        }

        if self.reports.chart_days == 0 {
            return Err(ConfigError::Invalid(
                "reports.chart_days must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `MEDISTORE_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup; unparseable numbers are
    /// ignored with a warning.
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("MEDISTORE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(name) = lookup("MEDISTORE_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(symbol) = lookup("MEDISTORE_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        if let Some(limit) = lookup("MEDISTORE_RECENT_LIMIT") {
            match limit.parse::<u32>() {
                Ok(limit) => self.reports.recent_limit = limit,
                Err(_) => warn!(value = %limit, "Ignoring non-numeric MEDISTORE_RECENT_LIMIT"),
            }
        }

        if let Some(days) = lookup("MEDISTORE_TOP_DAYS") {
            match days.parse::<u32>() {
                Ok(days) => self.reports.top_days = days,
                Err(_) => warn!(value = %days, "Ignoring non-numeric MEDISTORE_TOP_DAYS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "medistore", "medistore")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
