//! Group spending analytics
//!
//! Summaries derived from the live expenses and recorded settlements of one
//! group: totals, spending per payer, spending per day and a per-member
//! paid/owes breakdown. All amounts are quantized with the ledger rounding.

use crate::{ledger::GroupLedger, types::*, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Group-level totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Non-deleted expenses
    pub total_expenses: usize,
    /// Sum of non-deleted expense amounts
    pub total_spent: Decimal,
    /// Active members
    pub total_members: usize,
    /// Settlements marked complete
    pub completed_settlements: usize,
    /// Settlements still pending
    pub pending_settlements: usize,
}

/// Amount paid by one user across all live expenses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSpending {
    /// Payer
    pub user: UserProfile,
    /// Total paid
    pub amount: Decimal,
}

/// Amount spent on one calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySpending {
    /// Day the expenses were logged
    pub date: NaiveDate,
    /// Total logged that day
    pub amount: Decimal,
}

/// What an active member paid and owes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonBreakdown {
    /// Member
    pub user: UserProfile,
    /// Sum of expenses they paid
    pub total_paid: Decimal,
    /// Sum of their share lines
    pub total_owes: Decimal,
    /// `total_paid - total_owes`, before settlements
    pub net_balance: Decimal,
}

/// Analytics for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAnalytics {
    /// Group ID
    pub group_id: u64,
    /// Totals
    pub summary: AnalyticsSummary,
    /// Per payer, ascending user id
    pub spending_by_person: Vec<PersonSpending>,
    /// Per day, oldest first
    pub spending_timeline: Vec<DailySpending>,
    /// Per active member, in membership order
    pub per_person_breakdown: Vec<PersonBreakdown>,
}

impl GroupLedger {
    /// Spending analytics; the actor must be an active member
    pub fn analytics(&self, actor: UserId) -> Result<GroupAnalytics> {
        self.require_member(actor)?;
        let rounding = self.rounding();

        let mut total_spent = Decimal::ZERO;
        let mut total_expenses = 0;
        let mut paid: BTreeMap<UserId, Decimal> = BTreeMap::new();
        let mut owes: BTreeMap<UserId, Decimal> = BTreeMap::new();
        let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

        for expense in self.live_expenses() {
            total_expenses += 1;
            total_spent += expense.amount;
            *paid.entry(expense.paid_by).or_insert(Decimal::ZERO) += expense.amount;
            *by_day
                .entry(expense.created_at.date_naive())
                .or_insert(Decimal::ZERO) += expense.amount;
            for split in &expense.splits {
                *owes.entry(split.user_id).or_insert(Decimal::ZERO) += split.share_amount;
            }
        }

        let completed_settlements = self.settlements.iter().filter(|s| s.is_completed).count();

        let spending_by_person = paid
            .iter()
            .map(|(&user_id, &amount)| PersonSpending {
                user: self
                    .profile(user_id)
                    .cloned()
                    .unwrap_or_else(|| UserProfile::unknown(user_id)),
                amount: rounding.apply(amount),
            })
            .collect();

        let spending_timeline = by_day
            .into_iter()
            .map(|(date, amount)| DailySpending {
                date,
                amount: rounding.apply(amount),
            })
            .collect();

        let per_person_breakdown: Vec<PersonBreakdown> = self
            .active_members()
            .map(|m| {
                let total_paid = paid.get(&m.user_id()).copied().unwrap_or(Decimal::ZERO);
                let total_owes = owes.get(&m.user_id()).copied().unwrap_or(Decimal::ZERO);
                PersonBreakdown {
                    user: m.user.clone(),
                    total_paid: rounding.apply(total_paid),
                    total_owes: rounding.apply(total_owes),
                    net_balance: rounding.apply(total_paid - total_owes),
                }
            })
            .collect();

        debug!(
            group_id = self.group_id,
            expenses = total_expenses,
            members = per_person_breakdown.len(),
            "Analytics computed"
        );

        Ok(GroupAnalytics {
            group_id: self.group_id,
            summary: AnalyticsSummary {
                total_expenses,
                total_spent: rounding.apply(total_spent),
                total_members: per_person_breakdown.len(),
                completed_settlements,
                pending_settlements: self.settlements.len() - completed_settlements,
            },
            spending_by_person,
            spending_timeline,
            per_person_breakdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{split::SplitLine, split::SplitRule, Error};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn user(id: i64) -> UserId {
        UserId::new(id)
    }

    fn ledger() -> GroupLedger {
        let mut ledger = GroupLedger::new(3);
        for (id, name) in [(1, "ana"), (2, "ben"), (3, "cy")] {
            ledger.add_member(UserProfile::new(user(id), name, ""));
        }
        ledger
    }

    #[test]
    fn test_summary_and_breakdown() {
        let mut ledger = ledger();
        ledger
            .add_expense(user(1), "Hotel", dec!(90), &SplitRule::Equal)
            .unwrap();
        ledger
            .add_expense(
                user(2),
                "Snacks",
                dec!(12.50),
                &SplitRule::Exact(vec![
                    SplitLine::new(user(2), dec!(2.50)),
                    SplitLine::new(user(3), dec!(10)),
                ]),
            )
            .unwrap();
        let deleted = ledger
            .add_expense(user(3), "Typo", dec!(500), &SplitRule::Equal)
            .unwrap()
            .expense_id;
        ledger.delete_expense(user(3), deleted).unwrap();
        let records = ledger
            .record_settlements(
                user(3),
                &[SettlementTransfer {
                    from_user_id: user(3),
                    to_user_id: user(1),
                    amount: dec!(40),
                }],
            )
            .unwrap();
        ledger
            .complete_settlement(user(1), records[0].settlement_id)
            .unwrap();

        let analytics = ledger.analytics(user(2)).unwrap();

        assert_eq!(analytics.summary.total_expenses, 2);
        assert_eq!(analytics.summary.total_spent, dec!(102.50));
        assert_eq!(analytics.summary.total_members, 3);
        assert_eq!(analytics.summary.completed_settlements, 1);
        assert_eq!(analytics.summary.pending_settlements, 0);

        assert_eq!(analytics.spending_by_person.len(), 2);
        assert_eq!(analytics.spending_by_person[0].user.username, "ana");
        assert_eq!(analytics.spending_by_person[0].amount, dec!(90));

        let cy = &analytics.per_person_breakdown[2];
        assert_eq!(cy.total_paid, Decimal::ZERO);
        assert_eq!(cy.total_owes, dec!(40));
        assert_eq!(cy.net_balance, dec!(-40));

        let timeline_total: Decimal = analytics.spending_timeline.iter().map(|d| d.amount).sum();
        assert_eq!(timeline_total, dec!(102.50));
    }

    #[test]
    fn test_timeline_groups_by_day() {
        let mut ledger = ledger();
        for (day, amount) in [(2, dec!(10)), (1, dec!(5)), (2, dec!(7.25))] {
            let id = ledger
                .add_expense(user(1), "Coffee", amount, &SplitRule::Equal)
                .unwrap()
                .expense_id;
            let expense = ledger
                .expenses
                .iter_mut()
                .find(|e| e.expense_id == id)
                .unwrap();
            expense.created_at = Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap();
        }

        let analytics = ledger.analytics(user(1)).unwrap();
        let timeline = &analytics.spending_timeline;

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(timeline[0].amount, dec!(5));
        assert_eq!(timeline[1].amount, dec!(17.25));

        let json = serde_json::to_value(&analytics).unwrap();
        assert_eq!(json["spendingTimeline"][0]["date"], "2024-05-01");
        assert_eq!(json["summary"]["totalExpenses"], 3);
    }

    #[test]
    fn test_inactive_payer_reported_as_unknown() {
        let mut ledger = ledger();
        ledger
            .add_expense(user(3), "Fuel", dec!(30), &SplitRule::Equal)
            .unwrap();
        ledger.deactivate_member(user(3)).unwrap();

        let analytics = ledger.analytics(user(1)).unwrap();

        assert_eq!(analytics.spending_by_person[0].user, UserProfile::unknown(user(3)));
        assert_eq!(analytics.summary.total_members, 2);
        assert_eq!(analytics.per_person_breakdown.len(), 2);
    }

    #[test]
    fn test_requires_membership() {
        let ledger = ledger();
        assert!(matches!(ledger.analytics(user(8)), Err(Error::NotMember(u)) if u == user(8)));
    }
}
