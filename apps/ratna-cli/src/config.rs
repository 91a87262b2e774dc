//! # Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`RATNA_*`)
//! 2. Config file (`ratna.toml`, optional)
//! 3. Defaults (this file)
//!
//! ## Environment Variables
//! - `RATNA_DATABASE_PATH`: SQLite file to open
//! - `RATNA_SHOP_ID`: Shop every command runs against
//! - `RATNA_USER_ID`: Salesperson recorded on new sales
//! - `RATNA_CURRENCY_SYMBOL`: Symbol used when logging amounts

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use ratna_core::money::round_money;
use ratna_core::DEFAULT_SHOP_ID;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::context::RequestContext;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "ratna.toml";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: String,

    /// Shop every command is scoped to
    pub shop_id: String,

    /// User recorded on sales created from this terminal
    pub user_id: String,

    /// Currency symbol for display
    pub currency_symbol: String,
}

impl Default for AppConfig {
    /// Development defaults: the seeded demo shop in `./ratna_dev.db`.
    fn default() -> Self {
        AppConfig {
            database_path: "./ratna_dev.db".to_string(),
            shop_id: DEFAULT_SHOP_ID.to_string(),
            user_id: "counter-01".to_string(),
            currency_symbol: "₹".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from defaults, then `file` (or `ratna.toml`
    /// when absent, skipped if missing), then `RATNA_*` variables.
    ///
    /// An explicitly named file must exist.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = defaults()?;
        let builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config: AppConfig = builder
            .add_source(Environment::with_prefix("RATNA"))
            .build()?
            .try_deserialize()?;

        config.validated()
    }

    /// Loads configuration from defaults overlaid with TOML text.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validated()
    }

    /// The request context commands run under.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::new(&self.shop_id, &self.user_id)
    }

    /// Formats an amount for display, rounded to paise.
    ///
    /// ## Example
    /// ```rust
    /// use ratna_cli::config::AppConfig;
    /// use rust_decimal::Decimal;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Decimal::new(68100, 0)), "₹68100.00");
    /// ```
    pub fn format_currency(&self, amount: Decimal) -> String {
        let rounded = round_money(amount);
        format!(
            "{}{}{:.2}",
            if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" },
            self.currency_symbol,
            rounded.abs()
        )
    }

    fn validated(self) -> Result<Self, ConfigError> {
        for (key, value) in [
            ("database_path", &self.database_path),
            ("shop_id", &self.shop_id),
            ("user_id", &self.user_id),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingRequired(key.to_string()));
            }
        }
        Ok(self)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let d = AppConfig::default();
    Ok(config::Config::builder()
        .set_default("database_path", d.database_path)?
        .set_default("shop_id", d.shop_id)?
        .set_default("user_id", d.user_id)?
        .set_default("currency_symbol", d.currency_symbol)?)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.shop_id, DEFAULT_SHOP_ID);
        assert_eq!(config.database_path, "./ratna_dev.db");
        assert_eq!(config.currency_symbol, "₹");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = AppConfig::from_toml(
            r#"
            database_path = "/var/lib/ratna/shop.db"
            user_id = "asha"
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path, "/var/lib/ratna/shop.db");
        assert_eq!(config.user_id, "asha");
        assert_eq!(config.shop_id, DEFAULT_SHOP_ID);

        let ctx = config.request_context();
        assert_eq!(ctx.user_id, "asha");
    }

    #[test]
    fn test_blank_shop_rejected() {
        let result = AppConfig::from_toml(r#"shop_id = "  ""#);
        assert!(matches!(result, Err(ConfigError::MissingRequired(key)) if key == "shop_id"));
    }

    #[test]
    fn test_format_currency() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(dec!(68100)), "₹68100.00");
        assert_eq!(config.format_currency(dec!(1234.565)), "₹1234.57");
        assert_eq!(config.format_currency(dec!(-1900)), "-₹1900.00");
        assert_eq!(config.format_currency(Decimal::ZERO), "₹0.00");
    }
}
