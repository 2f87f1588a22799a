//! Runtime configuration, read from `CONFIRMDESK_*` environment variables.

use crate::application::enrichment::DEFAULT_ECONOMIC_BREAK_WEIGHT;
use thiserror::Error;

pub const DEFAULT_DB: &str = "confirmdesk.db";
pub const DEFAULT_EQUITY_SOURCE: &str = "data/equity_trade_lifecycle_dataset.csv";
pub const DEFAULT_FX_SOURCE: &str = "data/fx_trade_lifecycle_full_dataset.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(String),

    #[error("Invalid seed: {0}. Must be an unsigned integer")]
    InvalidSeed(String),

    #[error("Invalid economic break weight: {0}. Must be a number between 0 and 1")]
    InvalidBreakWeight(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: String,
    pub equity_source: String,
    pub fx_source: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Fixed seed for enrichment draws; entropy when unset.
    pub seed: Option<u64>,
    pub economic_break_weight: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB.to_string(),
            equity_source: DEFAULT_EQUITY_SOURCE.to_string(),
            fx_source: DEFAULT_FX_SOURCE.to_string(),
            host: "127.0.0.1".to_string(),
            port: 3001,
            log_level: "info".to_string(),
            seed: None,
            economic_break_weight: DEFAULT_ECONOMIC_BREAK_WEIGHT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests need not touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(db) = lookup("CONFIRMDESK_DB") {
            config.db_path = db;
        }
        if let Some(src) = lookup("CONFIRMDESK_EQUITY_SOURCE") {
            config.equity_source = src;
        }
        if let Some(src) = lookup("CONFIRMDESK_FX_SOURCE") {
            config.fx_source = src;
        }
        if let Some(host) = lookup("CONFIRMDESK_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("CONFIRMDESK_PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(level) = lookup("CONFIRMDESK_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(seed) = lookup("CONFIRMDESK_SEED") {
            config.seed = Some(
                seed.parse()
                    .map_err(|_| ConfigError::InvalidSeed(seed.clone()))?,
            );
        }
        if let Some(weight) = lookup("CONFIRMDESK_ECONOMIC_BREAK_WEIGHT") {
            config.economic_break_weight = weight
                .parse()
                .map_err(|_| ConfigError::InvalidBreakWeight(weight.clone()))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port.to_string()));
        }
        if !(0.0..=1.0).contains(&self.economic_break_weight) {
            return Err(ConfigError::InvalidBreakWeight(
                self.economic_break_weight.to_string(),
            ));
        }
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::InvalidLogLevel(self.log_level.clone())),
        }
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.economic_break_weight, 0.4);
        assert!(config.seed.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("CONFIRMDESK_DB", ":memory:"),
            ("CONFIRMDESK_PORT", "8080"),
            ("CONFIRMDESK_SEED", "42"),
            ("CONFIRMDESK_ECONOMIC_BREAK_WEIGHT", "0.25"),
        ])
        .unwrap();
        assert_eq!(config.db_path, ":memory:");
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.economic_break_weight, 0.25);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config_from(&[("CONFIRMDESK_PORT", "http")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            config_from(&[("CONFIRMDESK_ECONOMIC_BREAK_WEIGHT", "1.5")]),
            Err(ConfigError::InvalidBreakWeight(_))
        ));
        assert!(matches!(
            config_from(&[("CONFIRMDESK_SEED", "-1")]),
            Err(ConfigError::InvalidSeed(_))
        ));
        assert!(matches!(
            config_from(&[("CONFIRMDESK_LOG_LEVEL", "loud")]),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
