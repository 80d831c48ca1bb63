//! # Kiosk Configuration
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RESTO_DB_PATH, RESTO_NAME, RESTO_CURRENCY_SYMBOL,                  │
//! │     RESTO_STAFF_PIN, RESTO_SEED                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or resto.toml in the platform config dir          │
//! │     ~/.config/resto/resto.toml (Linux)                                 │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! restaurant_name = "Spice Route"
//! database_path = "/var/lib/resto/resto.db"
//! currency_symbol = "₹"
//! currency_decimals = 2
//! staff_pin = "4321"
//! seed_on_first_run = true
//! ```
//!
//! Configuration is read-only after startup, so no lock is needed.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use resto_core::validation::validate_staff_pin;
use resto_core::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "resto.toml";
const DATABASE_FILE: &str = "resto.db";
const MAX_CURRENCY_DECIMALS: u8 = 4;

// =============================================================================
// Config Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Could not determine the platform config directory")]
    NoConfigDir,
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Kiosk Config
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Shown in the menu header.
    pub restaurant_name: String,

    /// SQLite file. `None` means `resto.db` in the platform data dir.
    pub database_path: Option<PathBuf>,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Staff gate. `None` leaves staff commands open.
    pub staff_pin: Option<String>,

    /// Insert the starter menu when the catalog is empty.
    pub seed_on_first_run: bool,
}

impl Default for KioskConfig {
    fn default() -> Self {
        KioskConfig {
            restaurant_name: "Resto".to_string(),
            database_path: None,
            currency_symbol: "₹".to_string(),
            currency_decimals: 2,
            staff_pin: None,
            seed_on_first_run: true,
        }
    }
}

impl KioskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `config_path` if given (must exist), otherwise
    ///    `resto.toml` in the platform config dir if present
    /// 3. Environment variables
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

    /// Reads one TOML file. Missing keys take their default values.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("{}: {}", path.display(), e)))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.restaurant_name.trim().is_empty() {
            return Err(ConfigError::Invalid("restaurant_name must not be blank".into()));
        }

        if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be at most {}, got {}",
                MAX_CURRENCY_DECIMALS, self.currency_decimals
            )));
        }

        if let Some(pin) = &self.staff_pin {
            validate_staff_pin(pin).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }

        Ok(())
    }

    /// Applies `RESTO_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// Blank values are ignored; `RESTO_SEED` takes `true/false/1/0`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get("RESTO_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = get("RESTO_NAME") {
            self.restaurant_name = name;
        }

        if let Some(symbol) = get("RESTO_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(pin) = get("RESTO_STAFF_PIN") {
            debug!("Overriding staff PIN from environment");
            self.staff_pin = Some(pin);
        }

        if let Some(seed) = get("RESTO_SEED") {
            match seed.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.seed_on_first_run = true,
                "0" | "false" | "no" => self.seed_on_first_run = false,
                _ => warn!(value = %seed, "Unknown RESTO_SEED value in environment"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "resto", "resto").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Resolves the database file: the configured path, or the platform
    /// data directory (created if missing).
    pub fn resolve_database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("com", "resto", "resto").ok_or(ConfigError::NoConfigDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .map_err(|e| ConfigError::LoadFailed(format!("{}: {}", data_dir.display(), e)))?;

        Ok(data_dir.join(DATABASE_FILE))
    }

    /// Formats an amount with the configured symbol and decimals.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = KioskConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(26_000)), "₹260.00");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol, self.currency_decimals)
    }
}
