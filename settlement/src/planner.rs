//! Settlement planner
//!
//! Runs the debt graph builder and the optimizer against a group ledger and
//! annotates both outputs with member profiles.

use crate::{
    config::Config,
    graph::DebtGraphBuilder,
    optimizer::CashFlowOptimizer,
    types::*,
    Result,
};
use ledger_core::{GroupLedger, UserId, UserProfile};
use rust_decimal::Decimal;
use tracing::info;

/// Settlement planner
#[derive(Debug, Clone, Copy)]
pub struct SettlementPlanner {
    graph: DebtGraphBuilder,
    optimizer: CashFlowOptimizer,
    settled_tolerance: Decimal,
}

impl Default for SettlementPlanner {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl SettlementPlanner {
    /// Create new planner
    pub fn new(config: &Config) -> Self {
        let rounding = config.ledger.rounding();
        Self {
            graph: DebtGraphBuilder::new(rounding),
            optimizer: CashFlowOptimizer::new(rounding),
            settled_tolerance: config.ledger.settled_tolerance,
        }
    }

    /// Plan on behalf of `actor`, who must be an active member
    pub fn plan_for(&self, ledger: &GroupLedger, actor: UserId) -> Result<SettlementPlan> {
        ledger.require_member(actor)?;
        Ok(self.plan(ledger))
    }

    /// Build the optimized plan and the "before" graph for a group
    pub fn plan(&self, ledger: &GroupLedger) -> SettlementPlan {
        let before = self.graph.build(&ledger.debt_inputs());
        let result = self.optimizer.optimize(&ledger.net_balances());

        info!(
            group_id = ledger.group_id,
            debt_edges = before.len(),
            transactions = result.total_transactions,
            naive = result.naive_transactions,
            "Settlement plan computed"
        );

        let before_graph = before
            .iter()
            .map(|e| annotate(ledger, e.from, e.to, e.amount))
            .collect();
        let transactions: Vec<AnnotatedTransfer> = result
            .transactions
            .iter()
            .map(|t| annotate(ledger, t.from, t.to, t.amount))
            .collect();

        SettlementPlan {
            group_id: ledger.group_id,
            member_balances: ledger.member_balances(self.settled_tolerance),
            before_graph,
            after_graph: transactions.clone(),
            optimization: result.stats(),
            transactions,
        }
    }
}

fn profile(ledger: &GroupLedger, user_id: UserId) -> UserProfile {
    ledger
        .profile(user_id)
        .cloned()
        .unwrap_or_else(|| UserProfile::unknown(user_id))
}

fn annotate(ledger: &GroupLedger, from: UserId, to: UserId, amount: Decimal) -> AnnotatedTransfer {
    AnnotatedTransfer {
        from: profile(ledger, from),
        to: profile(ledger, to),
        amount,
    }
}
