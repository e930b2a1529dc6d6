//! Configuration for settlement planning

use serde::{Deserialize, Serialize};

/// Settlement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Ledger configuration (rounding, settled tolerance)
    pub ledger: ledger_core::Config,

    /// Pretty-print JSON output
    pub pretty_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "settle-plan".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            ledger: ledger_core::Config::default(),
            pretty_output: true,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML document
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.ledger.validate()?;
        Ok(config)
    }

    /// Load from environment variables.
    ///
    /// `SETTLEMENT_CONFIG` names a TOML file; without it the ledger section
    /// is read from the `LEDGER_*` variables.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from variables resolved through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let mut config = match lookup("SETTLEMENT_CONFIG") {
            Some(path) => Config::from_file(path)?,
            None => Config {
                ledger: ledger_core::Config::from_lookup(&lookup)?,
                ..Config::default()
            },
        };

        if let Some(pretty) = lookup("SETTLEMENT_PRETTY") {
            config.pretty_output = parse_flag(&pretty).ok_or_else(|| {
                crate::Error::Config(format!("SETTLEMENT_PRETTY must be a boolean, got {}", pretty))
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
