//! Configuration loading from the process environment.

use thiserror::Error;

use stockline_core::StockId;
use stockline_inventory::{BackorderPolicy, StockConfiguration};

pub const ENV_BIND_ADDR: &str = "STOCKLINE_BIND_ADDR";
pub const ENV_TABLE_PREFIX: &str = "STOCKLINE_TABLE_PREFIX";
pub const ENV_DEFAULT_STOCK_ID: &str = "STOCKLINE_DEFAULT_STOCK_ID";
pub const ENV_MANAGE_STOCK: &str = "STOCKLINE_MANAGE_STOCK";
pub const ENV_BACKORDERS: &str = "STOCKLINE_BACKORDERS";
pub const ENV_MIN_QTY: &str = "STOCKLINE_MIN_QTY";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub table_prefix: String,
    pub default_stock_id: StockId,
    pub stock: StockConfiguration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            table_prefix: String::new(),
            default_stock_id: StockId::DEFAULT,
            stock: StockConfiguration::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            config.bind_addr = addr;
        }
        if let Some(prefix) = lookup(ENV_TABLE_PREFIX) {
            config.table_prefix = prefix;
        }
        if let Some(raw) = lookup(ENV_DEFAULT_STOCK_ID) {
            config.default_stock_id = raw
                .parse()
                .map_err(|e: stockline_core::DomainError| invalid(ENV_DEFAULT_STOCK_ID, &raw, e))?;
        }
        if let Some(raw) = lookup(ENV_MANAGE_STOCK) {
            config.stock.manage_stock = parse_bool(&raw).ok_or_else(|| {
                invalid(ENV_MANAGE_STOCK, &raw, "expected true/false/1/0")
            })?;
        }
        if let Some(raw) = lookup(ENV_BACKORDERS) {
            let code: i64 = raw
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid(ENV_BACKORDERS, &raw, e))?;
            config.stock.backorders =
                BackorderPolicy::try_from(code).map_err(|e| invalid(ENV_BACKORDERS, &raw, e))?;
        }
        if let Some(raw) = lookup(ENV_MIN_QTY) {
            config.stock.min_qty = raw
                .trim()
                .parse()
                .map_err(|e: std::num::ParseFloatError| invalid(ENV_MIN_QTY, &raw, e))?;
        }

        Ok(config)
    }
}

fn invalid(name: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
