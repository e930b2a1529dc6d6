//! Splitpay Ledger Core
//!
//! Group expense ledger: members, shared expenses with split rules, and
//! recorded settlements. Every balance is derived from these records on
//! demand.
//!
//! # Invariants
//!
//! - Exact arithmetic: amounts are `Decimal`, quantized to cents
//! - Zero-sum: expense balances of a closed group sum to the split residue only
//! - Deterministic: same records → same balances

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod money;
pub mod split;
pub mod ledger;
pub mod analytics;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, Result};
pub use types::{
    Balances, BalanceStatus, ExpenseShares, ExpenseSplit, GroupExpense, Member, MemberBalance,
    SettlementHistory, SettlementRecord, SettlementTransfer, UserId, UserProfile,
};
pub use money::{round_amount, Rounding, RoundingMode};
pub use split::{SplitLine, SplitRule};
pub use ledger::GroupLedger;
pub use analytics::{AnalyticsSummary, DailySpending, GroupAnalytics, PersonBreakdown, PersonSpending};
pub use config::Config;
