//! Group snapshots
//!
//! A snapshot is a JSON-serialized [`GroupLedger`]: members, expenses and
//! recorded settlements of one group, as exported by the surrounding store.

use crate::{Error, Result};
use ledger_core::{
    money::{within_limit, MAX_AMOUNT},
    Config as LedgerConfig, GroupLedger,
};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Parse and validate a snapshot
pub fn parse_snapshot(json: &str, config: &LedgerConfig) -> Result<GroupLedger> {
    let ledger: GroupLedger = serde_json::from_str(json)?;
    validate(&ledger)?;

    debug!(
        group_id = ledger.group_id,
        members = ledger.members.len(),
        expenses = ledger.expenses.len(),
        settlements = ledger.settlements.len(),
        "Snapshot loaded"
    );

    Ok(ledger.with_config(config))
}

/// Read a snapshot file
pub fn load_snapshot(path: impl AsRef<Path>, config: &LedgerConfig) -> Result<GroupLedger> {
    let content = std::fs::read_to_string(path)?;
    parse_snapshot(&content, config)
}

fn validate(ledger: &GroupLedger) -> Result<()> {
    let mut seen = HashSet::new();
    for member in &ledger.members {
        if !seen.insert(member.user_id()) {
            return Err(Error::Snapshot(format!(
                "user {} appears twice in members",
                member.user_id()
            )));
        }
    }

    let mut expense_ids = HashSet::new();
    for expense in &ledger.expenses {
        if !expense_ids.insert(expense.expense_id) {
            return Err(Error::Snapshot(format!(
                "duplicate expense id {}",
                expense.expense_id
            )));
        }
        if expense.amount < Decimal::ZERO {
            return Err(Error::Snapshot(format!(
                "expense {} has negative amount {}",
                expense.expense_id, expense.amount
            )));
        }
        let oversized = std::iter::once(expense.amount)
            .chain(expense.splits.iter().map(|s| s.share_amount))
            .find(|&amount| !within_limit(amount));
        if let Some(amount) = oversized {
            return Err(Error::Snapshot(format!(
                "expense {} carries amount {} beyond the limit of {}",
                expense.expense_id, amount, MAX_AMOUNT
            )));
        }
    }

    if let Some(s) = ledger.settlements.iter().find(|s| {
        s.amount <= Decimal::ZERO || !within_limit(s.amount) || s.paid_by == s.paid_to
    }) {
        return Err(Error::Snapshot(format!(
            "settlement {} is not a payable transfer",
            s.settlement_id
        )));
    }

    Ok(())
}
