//! Split rules
//!
//! Turns an expense total and a rule into per-member share lines. Shares are
//! rounded to cents individually and are not forced to sum to the total; the
//! residue (at most a cent per member) stays in the payer's balance.

use crate::{
    money::{within_limit, Rounding, MAX_AMOUNT},
    types::{ExpenseSplit, UserId},
    Error, Result,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One user-supplied line of a non-equal split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLine {
    /// Participant
    pub user_id: UserId,

    /// Percentage, exact amount or share, depending on the rule
    #[serde(alias = "percentage", alias = "amount", alias = "shareAmount")]
    pub value: Decimal,
}

impl SplitLine {
    /// Create new line
    pub fn new(user_id: UserId, value: Decimal) -> Self {
        Self { user_id, value }
    }
}

/// How an expense is divided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "splitType", content = "splits", rename_all = "lowercase")]
pub enum SplitRule {
    /// Every active member owes total / n
    Equal,
    /// Each line owes `value` percent of the total
    Percentage(Vec<SplitLine>),
    /// Each line owes exactly `value`
    Exact(Vec<SplitLine>),
    /// Each line owes `value`, entered as a free-form share
    Custom(Vec<SplitLine>),
}

impl SplitRule {
    /// Rule name as used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            SplitRule::Equal => "equal",
            SplitRule::Percentage(_) => "percentage",
            SplitRule::Exact(_) => "exact",
            SplitRule::Custom(_) => "custom",
        }
    }
}

/// Compute share lines for an expense
pub fn compute_splits(
    total: Decimal,
    rule: &SplitRule,
    active_members: &[UserId],
    rounding: Rounding,
) -> Result<Vec<ExpenseSplit>> {
    if total <= Decimal::ZERO {
        return Err(Error::InvalidExpense(format!(
            "amount must be positive, got {}",
            total
        )));
    }
    if !within_limit(total) {
        return Err(Error::InvalidExpense(format!(
            "amount {} exceeds the limit of {}",
            total, MAX_AMOUNT
        )));
    }

    let hundred = Decimal::ONE_HUNDRED;

    let splits: Vec<ExpenseSplit> = match rule {
        SplitRule::Equal => {
            if active_members.is_empty() {
                return Err(Error::InvalidExpense(
                    "equal split needs at least one active member".to_string(),
                ));
            }
            let share = rounding.apply(total / Decimal::from(active_members.len()));
            active_members
                .iter()
                .map(|&user_id| ExpenseSplit {
                    user_id,
                    share_amount: share,
                })
                .collect()
        }
        SplitRule::Percentage(lines) => non_empty(rule, lines)?
            .iter()
            .map(|line| ExpenseSplit {
                user_id: line.user_id,
                share_amount: rounding.apply(line.value / hundred * total),
            })
            .collect(),
        SplitRule::Exact(lines) | SplitRule::Custom(lines) => non_empty(rule, lines)?
            .iter()
            .map(|line| ExpenseSplit {
                user_id: line.user_id,
                share_amount: rounding.apply(line.value),
            })
            .collect(),
    };

    Ok(splits)
}

fn non_empty<'a>(rule: &SplitRule, lines: &'a [SplitLine]) -> Result<&'a [SplitLine]> {
    if lines.is_empty() {
        return Err(Error::InvalidExpense(format!(
            "splits array required for {} split",
            rule.name()
        )));
    }
    if let Some(line) = lines.iter().find(|l| !within_limit(l.value)) {
        return Err(Error::InvalidExpense(format!(
            "split value {} for user {} exceeds the limit of {}",
            line.value, line.user_id, MAX_AMOUNT
        )));
    }
    Ok(lines)
}
