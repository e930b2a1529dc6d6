//! Debt graph builder
//!
//! Aggregates raw per-expense debts into one directed edge per ordered
//! (debtor, creditor) pair. This is the "before" picture shown next to the
//! optimized plan.
//!
//! # Example
//!
//! ```text
//! Expenses:
//!   A paid, split A 10 / B 10 / C 10
//!   A paid, split B 5
//!   C paid, split A 8 / C 8
//!
//! Edges:
//!   B -> A: 15
//!   C -> A: 10
//!   A -> C: 8
//! ```
//!
//! Opposing edges (A -> C and C -> A) are kept apart; netting them is the
//! optimizer's job.

use crate::types::{DebtEdge, ExpenseShares};
use ledger_core::{Rounding, UserId};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

/// Debt graph builder
#[derive(Debug, Clone, Copy, Default)]
pub struct DebtGraphBuilder {
    rounding: Rounding,
}

impl DebtGraphBuilder {
    /// Create new builder
    pub fn new(rounding: Rounding) -> Self {
        Self { rounding }
    }

    /// Build the consolidated debt graph.
    ///
    /// Every split line whose participant is not the payer adds its share to
    /// the `participant -> payer` edge. Edges are rounded once, after all
    /// expenses are summed, and only positive edges are emitted.
    pub fn build(&self, expenses: &[ExpenseShares]) -> Vec<DebtEdge> {
        let mut totals: BTreeMap<(UserId, UserId), Decimal> = BTreeMap::new();

        for expense in expenses {
            for split in &expense.splits {
                // A payer never owes themselves
                if split.user_id == expense.payer {
                    continue;
                }
                *totals
                    .entry((split.user_id, expense.payer))
                    .or_insert(Decimal::ZERO) += split.share_amount;
            }
        }

        let edges: Vec<DebtEdge> = totals
            .into_iter()
            .filter_map(|((from, to), total)| {
                let amount = self.rounding.apply(total);
                (amount > Decimal::ZERO).then_some(DebtEdge { from, to, amount })
            })
            .collect();

        debug!(
            expenses = expenses.len(),
            edges = edges.len(),
            "Debt graph built"
        );

        edges
    }
}

/// Build the debt graph with cent rounding
pub fn build_debt_graph(expenses: &[ExpenseShares]) -> Vec<DebtEdge> {
    DebtGraphBuilder::default().build(expenses)
}
