//! Error types for the group ledger

use crate::types::UserId;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Expense rejected before it reached the ledger
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),

    /// Settlement plan rejected before it was recorded
    #[error("Invalid settlement: {0}")]
    InvalidSettlement(String),

    /// Acting user has no active membership in the group
    #[error("User {0} is not a member of this group")]
    NotMember(UserId),

    /// Expense not found, or already deleted
    #[error("Expense not found: {0}")]
    ExpenseNotFound(u64),

    /// Acting user did not pay the expense
    #[error("Only the payer can change expense {expense_id}; user {user} did not pay it")]
    NotPayer {
        /// Expense being touched
        expense_id: u64,
        /// Acting user
        user: UserId,
    },

    /// Settlement record not found
    #[error("Settlement not found: {0}")]
    SettlementNotFound(u64),

    /// Acting user is neither payer nor payee of the settlement
    #[error("User {user} is not a participant of settlement {settlement_id}")]
    NotParticipant {
        /// Settlement being touched
        settlement_id: u64,
        /// Acting user
        user: UserId,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

