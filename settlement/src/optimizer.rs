//! Minimum cash flow optimizer
//!
//! Greedy settlement of net balances: the largest creditor is paired with
//! the largest debtor, the smaller side is paid off in full, and the
//! remainder carries into the next pairing.
//!
//! # Algorithm
//!
//! 1. Round balances to cents; split into creditors (> 0) and debtors (< 0)
//! 2. Sort both sides by amount, largest first
//! 3. Pay `min(creditor, debtor)` from debtor to creditor
//! 4. Advance whichever side reached zero (both on an exact match)
//!
//! Cost is `O(n log n)`. The plan is never larger than
//! `creditors + debtors - 1`, but it is not guaranteed minimal: finding
//! the true minimum requires subset-sum search.
//!
//! # Example
//!
//! ```text
//! Balances:   A +50, B +30, C -40, D -40
//!
//! Payments:
//!   D pays A: 40   (A has 10 left)
//!   C pays A: 10   (C has 30 left)
//!   C pays B: 30
//!
//! 3 transactions vs. 2 × 2 = 4 naive (25% reduction)
//! ```

use crate::types::{CashFlowResult, Transaction};
use ledger_core::{Rounding, UserId};
use rust_decimal::Decimal;
use tracing::debug;

/// Remaining amount of one side during matching
#[derive(Debug, Clone, Copy)]
struct Position {
    user_id: UserId,
    remaining: Decimal,
}

/// Minimum cash flow optimizer
#[derive(Debug, Clone, Copy, Default)]
pub struct CashFlowOptimizer {
    rounding: Rounding,
}

impl CashFlowOptimizer {
    /// Create new optimizer
    pub fn new(rounding: Rounding) -> Self {
        Self { rounding }
    }

    /// Compute a settlement plan for net balances.
    ///
    /// Accepts any map iterated as `(&UserId, &Decimal)`, e.g. `&Balances`
    /// or `&HashMap<UserId, Decimal>`. Users rounding to zero are skipped.
    pub fn optimize<'a, I>(&self, balances: I) -> CashFlowResult
    where
        I: IntoIterator<Item = (&'a UserId, &'a Decimal)>,
    {
        let (mut creditors, mut debtors) = self.partition(balances);

        let naive_transactions = creditors.len() * debtors.len();

        // Stable: equal amounts keep input order
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let transactions = self.match_positions(&mut creditors, &mut debtors);

        let total_transactions = transactions.len();
        let transactions_saved = naive_transactions.saturating_sub(total_transactions);
        let reduction_percent = if naive_transactions > 0 {
            self.rounding.apply(
                Decimal::from(transactions_saved) / Decimal::from(naive_transactions)
                    * Decimal::ONE_HUNDRED,
            )
        } else {
            Decimal::ZERO
        };

        debug!(
            creditors = creditors.len(),
            debtors = debtors.len(),
            total_transactions,
            naive_transactions,
            "Cash flow optimized"
        );

        CashFlowResult {
            transactions,
            total_transactions,
            naive_transactions,
            transactions_saved,
            reduction_percent,
        }
    }

    /// Split rounded balances into creditors and debtors (as magnitudes)
    fn partition<'a, I>(&self, balances: I) -> (Vec<Position>, Vec<Position>)
    where
        I: IntoIterator<Item = (&'a UserId, &'a Decimal)>,
    {
        let mut creditors = Vec::new();
        let mut debtors = Vec::new();

        for (&user_id, &balance) in balances {
            let rounded = self.rounding.apply(balance);
            if rounded > Decimal::ZERO {
                creditors.push(Position {
                    user_id,
                    remaining: rounded,
                });
            } else if rounded < Decimal::ZERO {
                debtors.push(Position {
                    user_id,
                    remaining: rounded.abs(),
                });
            }
        }

        (creditors, debtors)
    }

    /// Greedy two-cursor matching over sorted sides
    fn match_positions(
        &self,
        creditors: &mut [Position],
        debtors: &mut [Position],
    ) -> Vec<Transaction> {
        let mut transactions = Vec::new();
        let (mut ci, mut di) = (0, 0);

        while ci < creditors.len() && di < debtors.len() {
            let creditor = &mut creditors[ci];
            let debtor = &mut debtors[di];

            let settle_amount = self
                .rounding
                .apply(creditor.remaining.min(debtor.remaining));

            if settle_amount > Decimal::ZERO {
                transactions.push(Transaction {
                    from: debtor.user_id,
                    to: creditor.user_id,
                    amount: settle_amount,
                });
            }

            creditor.remaining = self.rounding.apply(creditor.remaining - settle_amount);
            debtor.remaining = self.rounding.apply(debtor.remaining - settle_amount);

            if creditor.remaining.is_zero() {
                ci += 1;
            }
            if debtor.remaining.is_zero() {
                di += 1;
            }
        }

        transactions
    }
}

/// Optimize net balances with cent rounding
pub fn minimum_cash_flow<'a, I>(balances: I) -> CashFlowResult
where
    I: IntoIterator<Item = (&'a UserId, &'a Decimal)>,
{
    CashFlowOptimizer::default().optimize(balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Balances;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn balances(entries: &[(i64, Decimal)]) -> Balances {
        entries
            .iter()
            .map(|&(id, amount)| (UserId::new(id), amount))
            .collect()
    }

    fn has(result: &CashFlowResult, from: i64, to: i64, amount: Decimal) -> bool {
        result.transactions.contains(&Transaction {
            from: UserId::new(from),
            to: UserId::new(to),
            amount,
        })
    }

    #[test]
    fn test_empty_balances() {
        let result = minimum_cash_flow(&Balances::new());

        assert!(result.transactions.is_empty());
        assert_eq!(result.naive_transactions, 0);
        assert_eq!(result.reduction_percent, Decimal::ZERO);
    }

    #[test]
    fn test_settled_group() {
        let result = minimum_cash_flow(&balances(&[(1, Decimal::ZERO), (2, Decimal::ZERO)]));

        assert!(result.transactions.is_empty());
        assert_eq!(result.naive_transactions, 0);
        assert_eq!(result.reduction_percent, Decimal::ZERO);
    }

    #[test]
    fn test_two_party() {
        let result = minimum_cash_flow(&balances(&[(1, dec!(100)), (2, dec!(-100))]));

        assert_eq!(result.transactions.len(), 1);
        assert!(has(&result, 2, 1, dec!(100)));
        assert_eq!(result.naive_transactions, 1);
        assert_eq!(result.total_transactions, 1);
        assert_eq!(result.transactions_saved, 0);
        assert_eq!(result.reduction_percent, Decimal::ZERO);
    }

    #[test]
    fn test_single_creditor() {
        let result = minimum_cash_flow(&balances(&[(1, dec!(60)), (2, dec!(-30)), (3, dec!(-30))]));

        assert_eq!(result.total_transactions, 2);
        assert!(has(&result, 2, 1, dec!(30)));
        assert!(has(&result, 3, 1, dec!(30)));
    }

    #[test]
    fn test_greedy_reduction() {
        // A=1, B=2, C=3, D=4
        let result = minimum_cash_flow(&balances(&[
            (1, dec!(50)),
            (2, dec!(30)),
            (3, dec!(-40)),
            (4, dec!(-40)),
        ]));

        assert_eq!(result.total_transactions, 3);
        assert_eq!(result.naive_transactions, 4);
        assert_eq!(result.transactions_saved, 1);
        assert_eq!(result.reduction_percent, dec!(25));

        // Every creditor ends up paid in full
        let received = |id: i64| -> Decimal {
            result
                .transactions
                .iter()
                .filter(|t| t.to == UserId::new(id))
                .map(|t| t.amount)
                .sum()
        };
        assert_eq!(received(1), dec!(50));
        assert_eq!(received(2), dec!(30));
    }

    #[test]
    fn test_sub_cent_balances_ignored() {
        let result = minimum_cash_flow(&balances(&[(1, dec!(0.004)), (2, dec!(-0.004))]));

        assert!(result.transactions.is_empty());
        assert_eq!(result.naive_transactions, 0);
    }

    #[test]
    fn test_repeating_decimal_residue() {
        let third = dec!(100) / dec!(3);
        let result = minimum_cash_flow(&balances(&[
            (1, third * dec!(2)),
            (2, -third),
            (3, -third),
        ]));

        // 66.67 owed, 33.33 + 33.33 paid: one cent stays with the creditor
        let paid: Decimal = result.transactions.iter().map(|t| t.amount).sum();
        assert_eq!(paid, dec!(66.66));
        assert!(result.transactions.iter().all(|t| t.amount > Decimal::ZERO));
    }

    #[test]
    fn test_accepts_hash_map() {
        let mut map = HashMap::new();
        map.insert(UserId::new(5), dec!(12.5));
        map.insert(UserId::new(6), dec!(-12.5));

        let result = minimum_cash_flow(&map);
        assert!(has(&result, 6, 5, dec!(12.50)));
    }

    #[test]
    fn test_half_even_rounding() {
        let optimizer = CashFlowOptimizer::new(Rounding::with_mode(ledger_core::RoundingMode::HalfEven));
        let result = optimizer.optimize(&balances(&[(1, dec!(10.125)), (2, dec!(-10.125))]));

        assert!(has(&result, 2, 1, dec!(10.12)));
    }
}
