//! Core types for settlement optimization

use ledger_core::{MemberBalance, SettlementTransfer, UserId, UserProfile};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use ledger_core::{Balances, ExpenseShares, ExpenseSplit};

/// Raw debt: `from` owes `to` exactly `amount`.
///
/// At most one edge exists per ordered pair; `from != to` and `amount > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DebtEdge {
    /// Debtor
    pub from: UserId,

    /// Creditor
    pub to: UserId,

    /// Accumulated amount, rounded to cents
    pub amount: Decimal,
}

/// Recommended payment in an optimized settlement plan
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    /// Paying user
    pub from: UserId,

    /// Receiving user
    pub to: UserId,

    /// Amount, always strictly positive
    pub amount: Decimal,
}

/// Plan size statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationStats {
    /// Transactions in the optimized plan
    pub total_transactions: usize,

    /// Baseline: creditors × debtors
    pub naive_transactions: usize,

    /// max(0, naive - total)
    pub transactions_saved: usize,

    /// saved / naive × 100, rounded to cents; 0 when naive is 0
    pub reduction_percent: Decimal,
}

/// Output of the minimum cash flow optimizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowResult {
    /// Payments settling every balance
    pub transactions: Vec<Transaction>,

    /// Transactions in the optimized plan
    pub total_transactions: usize,

    /// Baseline: creditors × debtors
    pub naive_transactions: usize,

    /// max(0, naive - total)
    pub transactions_saved: usize,

    /// saved / naive × 100, rounded to cents
    pub reduction_percent: Decimal,
}

impl CashFlowResult {
    /// Statistics without the transaction list
    pub fn stats(&self) -> OptimizationStats {
        OptimizationStats {
            total_transactions: self.total_transactions,
            naive_transactions: self.naive_transactions,
            transactions_saved: self.transactions_saved,
            reduction_percent: self.reduction_percent,
        }
    }
}

/// Edge or transaction with both ends resolved to profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedTransfer {
    /// Paying / owing user
    pub from: UserProfile,

    /// Receiving / owed user
    pub to: UserProfile,

    /// Amount
    pub amount: Decimal,
}

impl From<&AnnotatedTransfer> for SettlementTransfer {
    fn from(t: &AnnotatedTransfer) -> Self {
        Self {
            from_user_id: t.from.user_id,
            to_user_id: t.to.user_id,
            amount: t.amount,
        }
    }
}

/// "Optimize" response for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPlan {
    /// Group ID
    pub group_id: u64,

    /// Net balance and status of each active member
    pub member_balances: Vec<MemberBalance>,

    /// Raw pairwise debts before optimization
    pub before_graph: Vec<AnnotatedTransfer>,

    /// Optimized payments
    pub after_graph: Vec<AnnotatedTransfer>,

    /// Plan size statistics
    pub optimization: OptimizationStats,

    /// Optimized payments (same as `after_graph`)
    pub transactions: Vec<AnnotatedTransfer>,
}

impl SettlementPlan {
    /// Plan payments in the shape the ledger records when a plan is confirmed
    pub fn transfers(&self) -> Vec<SettlementTransfer> {
        self.transactions.iter().map(SettlementTransfer::from).collect()
    }
}
