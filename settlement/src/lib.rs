//! Settlement Optimizer
//!
//! Turns a group's ledger into a short list of payments that settles every
//! balance, plus the raw debt graph it replaces.
//!
//! # Architecture
//!
//! 1. **Debt graph**: aggregate split lines into one edge per (debtor, creditor)
//! 2. **Net balances**: derived by the ledger from expenses and past settlements
//! 3. **Cash flow**: greedily pair largest creditors with largest debtors
//! 4. **Plan**: annotate both with member profiles for display
//!
//! The graph builder and the optimizer are pure functions of their input and
//! never fail.
//!
//! # Example
//!
//! ```
//! use ledger_core::{Balances, UserId};
//! use rust_decimal::Decimal;
//! use settlement::minimum_cash_flow;
//!
//! let mut balances = Balances::new();
//! balances.insert(UserId::new(1), Decimal::new(10000, 2));
//! balances.insert(UserId::new(2), Decimal::new(-10000, 2));
//!
//! let result = minimum_cash_flow(&balances);
//! assert_eq!(result.total_transactions, 1);
//! assert_eq!(result.transactions[0].from, UserId::new(2));
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod graph;
pub mod optimizer;
pub mod planner;
pub mod snapshot;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use graph::{build_debt_graph, DebtGraphBuilder};
pub use optimizer::{minimum_cash_flow, CashFlowOptimizer};
pub use planner::SettlementPlanner;
