//! # Configuration State
//!
//! Stores register configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment Variables (highest priority)                           │
//! │     BAZAAR_STORE_NAME="Saddar Computers"                               │
//! │     BAZAAR_SETTINGS_PATH=/srv/pos/settings.json                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $BAZAAR_CONFIG_PATH, or                                            │
//! │     ~/.config/bazaar-pos/register.toml (Linux)                         │
//! │     ~/Library/Application Support/com.bazaar.pos/register.toml (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! store_name = "Saddar Computers"
//! store_address = ["Shop 12, Techno City", "Karachi"]
//! currency_code = "PKR"
//! currency_symbol = "Rs "
//! currency_decimals = 0
//! utc_offset_minutes = 300
//! quotation_validity_days = 7
//! settings_path = "/srv/pos/settings.json"
//! catalog_path = "/srv/pos/catalog.json"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no lock is needed.

use std::path::{Path, PathBuf};

use bazaar_core::Money;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// Register configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// Store name (printed on quotations)
    pub store_name: String,

    /// Store address lines (printed on quotations under the name)
    pub store_address: Vec<String>,

    /// Currency code (ISO 4217), stated on quotations
    pub currency_code: String,

    /// Currency symbol, including any spacing ("Rs ", "$")
    pub currency_symbol: String,

    /// Decimal places shown: 2, or 0 for currencies priced in whole units
    pub currency_decimals: u8,

    /// Shop timezone as a fixed offset from UTC
    pub utc_offset_minutes: i32,

    /// How long a printed quotation stays valid
    pub quotation_validity_days: u32,

    /// Offer settings file; defaults to the data directory
    pub settings_path: Option<PathBuf>,

    /// Catalog file; defaults to the data directory
    pub catalog_path: Option<PathBuf>,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    fn default() -> Self {
        ConfigState {
            store_name: "Bazaar POS Dev Store".to_string(),
            store_address: vec!["1 Main Boulevard".to_string()],
            currency_code: "PKR".to_string(),
            currency_symbol: "Rs ".to_string(),
            currency_decimals: 2,
            utc_offset_minutes: 0,
            quotation_validity_days: 7,
            settings_path: None,
            catalog_path: None,
        }
    }
}

impl ConfigState {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`register.toml`), when present
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os("BAZAAR_CONFIG_PATH").map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading register config from file");
                let contents = read_file(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load register config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !matches!(self.currency_decimals, 0 | 2) {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be 0 or 2, got {}",
                self.currency_decimals
            )));
        }

        // Real-world offsets run from -12:00 to +14:00
        if !(-12 * 60..=14 * 60).contains(&self.utc_offset_minutes) {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )));
        }

        if self.quotation_validity_days == 0 {
            return Err(ConfigError::Invalid(
                "quotation_validity_days must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `BAZAAR_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key/value source.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("BAZAAR_STORE_NAME") {
            debug!(store_name = %name, "Overriding store name from environment");
            self.store_name = name;
        }

        if let Some(code) = lookup("BAZAAR_CURRENCY_CODE") {
            self.currency_code = code;
        }

        if let Some(symbol) = lookup("BAZAAR_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(path) = lookup("BAZAAR_SETTINGS_PATH") {
            debug!(path = %path, "Overriding settings path from environment");
            self.settings_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("BAZAAR_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog_path = Some(PathBuf::from(path));
        }

        if let Some(days) = lookup("BAZAAR_QUOTE_VALIDITY_DAYS") {
            match days.parse::<u32>() {
                Ok(d) => self.quotation_validity_days = d,
                Err(_) => warn!(value = %days, "Ignoring invalid BAZAAR_QUOTE_VALIDITY_DAYS"),
            }
        }

        if let Some(offset) = lookup("BAZAAR_UTC_OFFSET_MINUTES") {
            match offset.parse::<i32>() {
                Ok(m) => self.utc_offset_minutes = m,
                Err(_) => warn!(value = %offset, "Ignoring invalid BAZAAR_UTC_OFFSET_MINUTES"),
            }
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "bazaar", "pos")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("register.toml"))
    }

    /// Resolves the offer settings file.
    pub fn settings_file(&self) -> Option<PathBuf> {
        self.settings_path
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join("settings.json")))
    }

    /// Resolves the catalog file.
    pub fn catalog_file(&self) -> Option<PathBuf> {
        self.catalog_path
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().join("catalog.json")))
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::Money;
    /// use bazaar_register::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(123_456)), "Rs 1234.56");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();

        if self.currency_decimals == 0 {
            // whole units, half up
            format!("{}{}{}", sign, self.currency_symbol, (abs + 50) / 100)
        } else {
            format!("{}{}{}.{:02}", sign, self.currency_symbol, abs / 100, abs % 100)
        }
    }

    /// The shop's UTC offset.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Converts an instant to shop-local time for display.
    pub fn local_time(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.utc_offset())
    }
}

/// Reads a whole file, attaching the path to any error.
pub(crate) fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    #[test]
    fn test_format_currency_two_decimals() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "Rs 12.34");
        assert_eq!(config.format_currency(Money::from_cents(1)), "Rs 0.01");
        assert_eq!(config.format_currency(Money::zero()), "Rs 0.00");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-Rs 12.34");
    }

    #[test]
    fn test_format_currency_whole_units() {
        let config = ConfigState {
            currency_decimals: 0,
            ..ConfigState::default()
        };
        assert_eq!(config.format_currency(Money::from_cents(1_250_000)), "Rs 12500");
        assert_eq!(config.format_currency(Money::from_cents(1_250_050)), "Rs 12501");
        assert_eq!(config.format_currency(Money::from_cents(1_250_049)), "Rs 12500");
    }

    #[test]
    fn test_toml_parsing_fills_defaults() {
        let config: ConfigState = toml::from_str(
            r#"
            store_name = "Saddar Computers"
            currency_decimals = 0
            utc_offset_minutes = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.store_name, "Saddar Computers");
        assert_eq!(config.currency_decimals, 0);
        assert_eq!(config.quotation_validity_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let config = ConfigState {
            currency_decimals: 3,
            ..ConfigState::default()
        };
        assert!(config.validate().is_err());

        let config = ConfigState {
            utc_offset_minutes: 15 * 60,
            ..ConfigState::default()
        };
        assert!(config.validate().is_err());

        let config = ConfigState {
            quotation_validity_days: 0,
            ..ConfigState::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BAZAAR_STORE_NAME", "Hall Road Electronics"),
            ("BAZAAR_SETTINGS_PATH", "/tmp/settings.json"),
            ("BAZAAR_QUOTE_VALIDITY_DAYS", "not-a-number"),
            ("BAZAAR_UTC_OFFSET_MINUTES", "300"),
        ]
        .into_iter()
        .collect();

        let mut config = ConfigState::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.store_name, "Hall Road Electronics");
        assert_eq!(config.settings_file(), Some(PathBuf::from("/tmp/settings.json")));
        assert_eq!(config.quotation_validity_days, 7);
        assert_eq!(config.utc_offset_minutes, 300);
    }

    #[test]
    fn test_local_time() {
        let config = ConfigState {
            utc_offset_minutes: 300,
            ..ConfigState::default()
        };
        let instant = Utc.with_ymd_and_hms(2025, 1, 1, 20, 0, 0).unwrap();
        assert_eq!(config.local_time(instant).to_rfc3339(), "2025-01-02T01:00:00+05:00");
    }

    #[test]
    fn test_load_or_default_survives_bad_file() {
        let path = std::env::temp_dir().join(format!("bazaar-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "currency_decimals = \"two\"").unwrap();

        assert!(ConfigState::load(Some(path.clone())).is_err());
        let config = ConfigState::load_or_default(Some(path.clone()));
        assert_eq!(config.currency_decimals, 2);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = ConfigState::load(Some(PathBuf::from("/nonexistent/register.toml"))).unwrap();
        assert_eq!(config.currency_code, ConfigState::default().currency_code);
    }
}
