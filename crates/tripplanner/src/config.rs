//! Configuration management for tripplanner.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::NaiveDate;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "tripplanner";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "planner.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "TRIPPLAN_";

/// Storage key prefixes must be lowercase identifiers.
static KEY_PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid key prefix regex"));

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TRIPPLAN_`, sections split by `__`)
/// 2. TOML config file at `~/.config/tripplanner/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Trip details.
    pub trip: TripConfig,
    /// Dashboard configuration.
    pub dashboard: DashboardConfig,
    /// Export configuration.
    pub export: ExportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/tripplanner/planner.db`
    pub database_path: Option<PathBuf>,
    /// Prefix for the collection keys, e.g. `trip` gives `trip_flights`.
    pub key_prefix: String,
}

/// The trip being planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripConfig {
    /// Display name of the trip.
    pub name: String,
    /// Departure day, used by the countdown.
    pub departure_date: Option<NaiveDate>,
    /// Symbol printed before money amounts.
    pub currency_symbol: String,
}

/// Caps for the next-tasks feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Incomplete checklist items shown.
    pub max_checklist_tasks: usize,
    /// Upcoming activities shown.
    pub max_upcoming_activities: usize,
    /// Pending documents shown.
    pub max_pending_documents: usize,
}

/// Export-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for exported snapshots.
    /// Defaults to the current directory.
    pub directory: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Resolved at runtime
            key_prefix: "trip".to_string(),
        }
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            name: "My trip".to_string(),
            departure_date: None,
            currency_symbol: "$".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_checklist_tasks: 3,
            max_upcoming_activities: 2,
            max_pending_documents: 2,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `TRIPPLAN_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if !KEY_PREFIX_PATTERN.is_match(&self.storage.key_prefix) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "key_prefix `{}` must start with a lowercase letter \
                     and contain only a-z, 0-9 or _",
                    self.storage.key_prefix
                ),
            });
        }

        if self.trip.name.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "trip name cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the directory exported snapshots are written to.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Format a money amount with the configured currency symbol.
    #[must_use]
    pub fn format_money(&self, amount: f64) -> String {
        format!("{} {amount:.2}", self.trip.currency_symbol)
    }
}
