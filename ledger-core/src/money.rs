//! Currency rounding
//!
//! Every amount in the ledger is an exact [`Decimal`]. Rounding happens at
//! a fixed scale (cents) after each arithmetic step, so a running balance
//! that should reach zero reaches exactly zero.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places kept for every stored or emitted amount
pub const AMOUNT_SCALE: u32 = 2;

/// Largest magnitude accepted for a single amount (one trillion).
///
/// Keeps every running sum of a group far below `Decimal::MAX`, so balance
/// accumulation cannot overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Whether an amount is within [`MAX_AMOUNT`] in magnitude
pub fn within_limit(amount: Decimal) -> bool {
    amount.abs() <= MAX_AMOUNT
}

/// Midpoint handling when quantizing an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round half away from zero (0.005 -> 0.01, -0.005 -> -0.01)
    #[default]
    HalfUp,
    /// Round half to the nearest even digit (banker's rounding)
    HalfEven,
}

impl RoundingMode {
    /// Parse from a config/env string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "half_up" | "halfup" => Some(RoundingMode::HalfUp),
            "half_even" | "halfeven" | "bankers" => Some(RoundingMode::HalfEven),
            _ => None,
        }
    }

    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// Quantizer applied to amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rounding {
    /// Number of decimal places
    pub scale: u32,
    /// Midpoint strategy
    pub mode: RoundingMode,
}

impl Rounding {
    /// Cents, half away from zero
    pub const fn cents() -> Self {
        Self {
            scale: AMOUNT_SCALE,
            mode: RoundingMode::HalfUp,
        }
    }

    /// Cents with an explicit midpoint strategy
    pub const fn with_mode(mode: RoundingMode) -> Self {
        Self {
            scale: AMOUNT_SCALE,
            mode,
        }
    }

    /// Quantize an amount
    pub fn apply(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.scale, self.mode.strategy())
    }
}

impl Default for Rounding {
    fn default() -> Self {
        Self::cents()
    }
}

/// Round to cents, half away from zero
pub fn round_amount(amount: Decimal) -> Decimal {
    Rounding::cents().apply(amount)
}
