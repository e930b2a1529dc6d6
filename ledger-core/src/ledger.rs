//! In-memory group ledger
//!
//! Holds one group's members, expenses and recorded settlements, and derives
//! every balance from them. Nothing is cached: balances are recomputed from
//! the records on each call.
//!
//! # Invariants
//!
//! - Deleted expenses never contribute to a balance or a debt edge
//! - Only active members are seeded into balances and member listings
//! - Recorded settlements move the payer up and the payee down by the same amount

use crate::{
    config::Config,
    money::{within_limit, Rounding},
    split::{compute_splits, SplitRule},
    types::*,
    Error, Result,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One group's ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLedger {
    /// Group ID
    pub group_id: u64,

    /// Memberships, active and inactive
    #[serde(default)]
    pub members: Vec<Member>,

    /// Expenses, including soft-deleted ones
    #[serde(default)]
    pub expenses: Vec<GroupExpense>,

    /// Recorded settlements
    #[serde(default)]
    pub settlements: Vec<SettlementRecord>,

    #[serde(skip, default)]
    rounding: Rounding,
}

impl GroupLedger {
    /// Create an empty ledger
    pub fn new(group_id: u64) -> Self {
        Self {
            group_id,
            members: Vec::new(),
            expenses: Vec::new(),
            settlements: Vec::new(),
            rounding: Rounding::default(),
        }
    }

    /// Apply ledger configuration
    pub fn with_config(mut self, config: &Config) -> Self {
        self.rounding = config.rounding();
        self
    }

    /// Rounding used for every derived amount
    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Add an active member
    pub fn add_member(&mut self, user: UserProfile) {
        match self.members.iter_mut().find(|m| m.user_id() == user.user_id) {
            Some(existing) => {
                existing.user = user;
                existing.is_active = true;
            }
            None => self.members.push(Member::active(user)),
        }
    }

    /// Deactivate a member; their records stay in the ledger
    pub fn deactivate_member(&mut self, user_id: UserId) -> Result<()> {
        let member = self
            .members
            .iter_mut()
            .find(|m| m.user_id() == user_id && m.is_active)
            .ok_or(Error::NotMember(user_id))?;
        member.is_active = false;
        Ok(())
    }

    /// Active memberships
    pub fn active_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_active)
    }

    /// Profile of an active member
    pub fn profile(&self, user_id: UserId) -> Option<&UserProfile> {
        self.active_members()
            .find(|m| m.user_id() == user_id)
            .map(|m| &m.user)
    }

    /// Check active membership
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.profile(user_id).is_some()
    }

    /// Fail with [`Error::NotMember`] unless the user is an active member
    pub fn require_member(&self, user_id: UserId) -> Result<()> {
        if self.is_member(user_id) {
            Ok(())
        } else {
            Err(Error::NotMember(user_id))
        }
    }

    /// Non-deleted expenses
    pub fn live_expenses(&self) -> impl Iterator<Item = &GroupExpense> {
        self.expenses.iter().filter(|e| !e.is_deleted)
    }

    /// Log a new expense paid by `actor`, split according to `rule`
    pub fn add_expense(
        &mut self,
        actor: UserId,
        title: impl Into<String>,
        amount: Decimal,
        rule: &SplitRule,
    ) -> Result<&GroupExpense> {
        self.require_member(actor)?;

        let title = title.into();
        if title.trim().is_empty() {
            return Err(Error::InvalidExpense("title is required".to_string()));
        }

        let member_ids: Vec<UserId> = self.active_members().map(Member::user_id).collect();
        let splits = compute_splits(amount, rule, &member_ids, self.rounding)?;

        let expense_id = self.expenses.iter().map(|e| e.expense_id).max().unwrap_or(0) + 1;
        info!(
            group_id = self.group_id,
            expense_id,
            split_type = rule.name(),
            lines = splits.len(),
            "Expense added"
        );

        self.expenses.push(GroupExpense {
            expense_id,
            title,
            description: None,
            amount: self.rounding.apply(amount),
            paid_by: actor,
            splits,
            is_deleted: false,
            created_at: Utc::now(),
        });

        Ok(&self.expenses[self.expenses.len() - 1])
    }

    /// Soft-delete an expense; only its payer may do so
    pub fn delete_expense(&mut self, actor: UserId, expense_id: u64) -> Result<()> {
        let expense = self
            .expenses
            .iter_mut()
            .find(|e| e.expense_id == expense_id && !e.is_deleted)
            .ok_or(Error::ExpenseNotFound(expense_id))?;

        if expense.paid_by != actor {
            return Err(Error::NotPayer {
                expense_id,
                user: actor,
            });
        }

        expense.is_deleted = true;
        info!(group_id = self.group_id, expense_id, "Expense deleted");
        Ok(())
    }

    /// Balances from expenses alone: payer +amount, each split line -share
    pub fn expense_balances(&self) -> Balances {
        let mut balances: Balances = self
            .active_members()
            .map(|m| (m.user_id(), Decimal::ZERO))
            .collect();

        for expense in self.live_expenses() {
            *balances.entry(expense.paid_by).or_insert(Decimal::ZERO) += expense.amount;
            for split in &expense.splits {
                *balances.entry(split.user_id).or_insert(Decimal::ZERO) -= split.share_amount;
            }
        }

        balances
    }

    /// Expense balances adjusted by recorded settlements
    pub fn net_balances(&self) -> Balances {
        let mut balances = self.expense_balances();

        for settlement in &self.settlements {
            // Paying reduces the payer's debt, receiving reduces the payee's credit
            *balances.entry(settlement.paid_by).or_insert(Decimal::ZERO) += settlement.amount;
            *balances.entry(settlement.paid_to).or_insert(Decimal::ZERO) -= settlement.amount;
        }

        balances
    }

    /// Payer and split lines of each non-deleted expense
    pub fn debt_inputs(&self) -> Vec<ExpenseShares> {
        self.live_expenses().map(ExpenseShares::from).collect()
    }

    /// Net balance and status of each active member
    pub fn member_balances(&self, tolerance: Decimal) -> Vec<MemberBalance> {
        let balances = self.net_balances();

        self.active_members()
            .map(|m| {
                let raw = balances.get(&m.user_id()).copied().unwrap_or(Decimal::ZERO);
                MemberBalance {
                    user: m.user.clone(),
                    balance: self.rounding.apply(raw),
                    status: BalanceStatus::classify(raw, tolerance),
                }
            })
            .collect()
    }

    /// Record a confirmed settlement plan
    pub fn record_settlements(
        &mut self,
        actor: UserId,
        transfers: &[SettlementTransfer],
    ) -> Result<Vec<SettlementRecord>> {
        if transfers.is_empty() {
            return Err(Error::InvalidSettlement(
                "transactions array is required".to_string(),
            ));
        }
        self.require_member(actor)?;

        if let Some(bad) = transfers.iter().find(|t| {
            t.amount <= Decimal::ZERO || !within_limit(t.amount) || t.from_user_id == t.to_user_id
        }) {
            return Err(Error::InvalidSettlement(format!(
                "{} -> {} for {} is not a payable transfer",
                bad.from_user_id, bad.to_user_id, bad.amount
            )));
        }

        let mut next_id = self.settlements.iter().map(|s| s.settlement_id).max().unwrap_or(0);
        let created_at = Utc::now();

        let records: Vec<SettlementRecord> = transfers
            .iter()
            .map(|t| {
                next_id += 1;
                SettlementRecord {
                    settlement_id: next_id,
                    paid_by: t.from_user_id,
                    paid_to: t.to_user_id,
                    amount: self.rounding.apply(t.amount),
                    is_completed: false,
                    created_at,
                }
            })
            .collect();

        self.settlements.extend(records.iter().cloned());
        info!(
            group_id = self.group_id,
            count = records.len(),
            "Settlement plan confirmed"
        );

        Ok(records)
    }

    /// Mark a settlement complete; only its payer or payee may do so
    pub fn complete_settlement(&mut self, actor: UserId, settlement_id: u64) -> Result<&SettlementRecord> {
        let settlement = self
            .settlements
            .iter_mut()
            .find(|s| s.settlement_id == settlement_id)
            .ok_or(Error::SettlementNotFound(settlement_id))?;

        if settlement.paid_by != actor && settlement.paid_to != actor {
            return Err(Error::NotParticipant {
                settlement_id,
                user: actor,
            });
        }

        settlement.is_completed = true;
        info!(group_id = self.group_id, settlement_id, "Settlement completed");

        Ok(settlement)
    }

    /// Past settlements, newest first
    pub fn settlement_history(&self, actor: UserId) -> Result<SettlementHistory> {
        self.require_member(actor)?;

        let mut settlements = self.settlements.clone();
        settlements.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.settlement_id.cmp(&a.settlement_id))
        });

        let total: Decimal = settlements.iter().map(|s| s.amount).sum();

        Ok(SettlementHistory {
            group_id: self.group_id,
            total_settlements: settlements.len(),
            total_amount: self.rounding.apply(total),
            settlements,
        })
    }
}
