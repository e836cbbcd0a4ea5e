//! # Application Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults (this file)                                               │
//! │  2. Config file                                                        │
//! │     --config <path>, or                                                 │
//! │     ~/.config/scanpos/scanpos.toml (Linux)                             │
//! │     ~/Library/Application Support/com.scanpos.pos/scanpos.toml (macOS) │
//! │  3. Environment variables (SCANPOS_*)                                  │
//! │  4. --db <path> on the command line                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```toml
//! # scanpos.toml
//! store_name = "Tạp hóa Minh Anh"
//! database_path = "/var/lib/scanpos/scanpos.db"
//! currency_symbol = "đ"
//! thousands_separator = "."
//! ```
//!
//! Configuration is read-only after loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use scanpos_core::Money;

/// File name of the config file and of the default database.
const CONFIG_FILE_NAME: &str = "scanpos.toml";
const DATABASE_FILE_NAME: &str = "scanpos.db";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not determine the application data directory")]
    NoDataDir,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Printed on receipts.
    pub store_name: String,

    /// SQLite file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Appended to amounts.
    pub currency_symbol: String,

    /// Separator between groups of three digits.
    pub thousands_separator: char,
}

impl Default for AppConfig {
    /// Vietnamese retail defaults: amounts print as `25.000 đ`.
    fn default() -> Self {
        AppConfig {
            store_name: "ScanPOS".to_string(),
            database_path: None,
            currency_symbol: "đ".to_string(),
            thousands_separator: '.',
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit `config_path` must exist; the default location is
    /// optional.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    AppConfig::default()
                }
                None => AppConfig::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Reads a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `SCANPOS_*` overrides found through `lookup`.
    ///
    /// ## Variables
    /// - `SCANPOS_DB_PATH`: database file
    /// - `SCANPOS_STORE_NAME`: store name
    /// - `SCANPOS_CURRENCY_SYMBOL`: currency symbol
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("SCANPOS_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("SCANPOS_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(symbol) = lookup("SCANPOS_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }
    }

    /// Replaces the database path when `path` is given.
    pub fn with_database_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.database_path = path;
        }
        self
    }

    /// Returns the database file to open, creating its directory.
    ///
    /// ## Platform-Specific Defaults
    /// - **Linux**: `~/.local/share/scanpos/scanpos.db`
    /// - **macOS**: `~/Library/Application Support/com.scanpos.pos/scanpos.db`
    /// - **Windows**: `%APPDATA%\scanpos\pos\data\scanpos.db`
    pub fn resolve_database_path(&self) -> Result<PathBuf, ConfigError> {
        let path = match &self.database_path {
            Some(path) => path.clone(),
            None => directories::ProjectDirs::from("com", "scanpos", "pos")
                .ok_or(ConfigError::NoDataDir)?
                .data_dir()
                .join(DATABASE_FILE_NAME),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        Ok(path)
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use scanpos_cli::config::AppConfig;
    /// use scanpos_core::Money;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_units(25_000)), "25.000 đ");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let grouped = amount.grouped(self.thousands_separator);
        if self.currency_symbol.is_empty() {
            grouped
        } else {
            format!("{} {}", grouped, self.currency_symbol)
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "scanpos", "pos")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
