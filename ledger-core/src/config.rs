//! Configuration for the group ledger

use crate::money::{Rounding, RoundingMode, AMOUNT_SCALE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rounding configuration
    pub rounding: RoundingConfig,

    /// Balances within +/- this amount are reported as settled
    pub settled_tolerance: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rounding: RoundingConfig::default(),
            settled_tolerance: Decimal::new(5, 3), // 0.005, half a cent
        }
    }
}

/// Rounding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundingConfig {
    /// Decimal places
    pub scale: u32,

    /// Midpoint strategy
    pub mode: RoundingMode,
}

impl Default for RoundingConfig {
    fn default() -> Self {
        Self {
            scale: AMOUNT_SCALE,
            mode: RoundingMode::HalfUp,
        }
    }
}

impl Config {
    /// Rounding derived from this configuration
    pub fn rounding(&self) -> Rounding {
        Rounding {
            scale: self.rounding.scale,
            mode: self.rounding.mode,
        }
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML document
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from `LEDGER_*` variables resolved through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let mut config = Config::default();

        if let Some(mode) = lookup("LEDGER_ROUNDING_MODE") {
            config.rounding.mode = RoundingMode::parse(&mode).ok_or_else(|| {
                crate::Error::Config(format!("Unknown rounding mode: {}", mode))
            })?;
        }

        if let Some(tolerance) = lookup("LEDGER_SETTLED_TOLERANCE") {
            config.settled_tolerance = Decimal::from_str(tolerance.trim()).map_err(|e| {
                crate::Error::Config(format!("Invalid settled tolerance {}: {}", tolerance, e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject a negative tolerance or an out-of-range scale
    pub fn validate(&self) -> crate::Result<()> {
        if self.settled_tolerance.is_sign_negative() {
            return Err(crate::Error::Config(
                "settled_tolerance must not be negative".to_string(),
            ));
        }
        if self.rounding.scale > 8 {
            return Err(crate::Error::Config(format!(
                "rounding scale {} is out of range",
                self.rounding.scale
            )));
        }
        Ok(())
    }
}
