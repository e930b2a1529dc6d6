//! End-to-end settlement flow: log expenses, plan, confirm, re-plan

use ledger_core::{
    BalanceStatus, GroupLedger, SettlementTransfer, SplitLine, SplitRule, UserId, UserProfile,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use settlement::{minimum_cash_flow, SettlementPlanner};

fn user(id: i64) -> UserId {
    UserId::new(id)
}

fn trip() -> GroupLedger {
    let mut ledger = GroupLedger::new(21);
    for (id, name) in [(1, "asha"), (2, "bruno"), (3, "chen"), (4, "dana")] {
        ledger.add_member(UserProfile::new(user(id), name, format!("{}@example.com", name)));
    }
    ledger
}

#[test]
fn test_confirmed_plan_settles_group() {
    let mut ledger = trip();
    ledger
        .add_expense(user(1), "Rental car", dec!(240), &SplitRule::Equal)
        .unwrap();
    ledger
        .add_expense(
            user(2),
            "Groceries",
            dec!(75.40),
            &SplitRule::Percentage(vec![
                SplitLine::new(user(1), dec!(25)),
                SplitLine::new(user(2), dec!(25)),
                SplitLine::new(user(3), dec!(50)),
            ]),
        )
        .unwrap();
    ledger
        .add_expense(
            user(4),
            "Museum",
            dec!(36),
            &SplitRule::Exact(vec![
                SplitLine::new(user(3), dec!(18)),
                SplitLine::new(user(4), dec!(18)),
            ]),
        )
        .unwrap();

    let planner = SettlementPlanner::default();
    let plan = planner.plan_for(&ledger, user(3)).unwrap();
    assert!(!plan.transactions.is_empty());
    assert!(plan.transactions.len() <= 3);

    let transfers = plan.transfers();
    assert_eq!(transfers.len(), plan.transactions.len());
    assert_eq!(transfers[0], SettlementTransfer::from(&plan.transactions[0]));
    ledger.record_settlements(user(1), &transfers).unwrap();

    let replanned = planner.plan(&ledger);
    assert!(replanned.transactions.is_empty());
    assert_eq!(replanned.optimization.naive_transactions, 0);
    assert!(replanned
        .member_balances
        .iter()
        .all(|m| m.status == BalanceStatus::Settled));

    // The "before" graph is built from expenses only and is unchanged
    assert_eq!(replanned.before_graph, plan.before_graph);

    let history = ledger.settlement_history(user(4)).unwrap();
    assert_eq!(history.total_settlements, transfers.len());
}

#[test]
fn test_greedy_reduction_statistics() {
    let balances = [
        (user(1), dec!(50)),
        (user(2), dec!(30)),
        (user(3), dec!(-40)),
        (user(4), dec!(-40)),
    ]
    .into_iter()
    .collect::<ledger_core::Balances>();

    let result = minimum_cash_flow(&balances);

    assert_eq!(result.total_transactions, 3);
    assert_eq!(result.naive_transactions, 4);
    assert_eq!(result.transactions_saved, 1);
    assert_eq!(result.reduction_percent, dec!(25.00));
}

#[test]
fn test_plan_serializes_wire_names() {
    let mut ledger = trip();
    ledger
        .add_expense(user(1), "Ferry", dec!(40), &SplitRule::Equal)
        .unwrap();

    let plan = SettlementPlanner::default().plan(&ledger);
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["groupId"], 21);
    assert!(json["beforeGraph"].is_array());
    assert!(json["afterGraph"].is_array());
    assert_eq!(json["optimization"]["naiveTransactions"], 3);
    assert_eq!(json["memberBalances"][0]["status"], "gets back");
    assert_eq!(json["transactions"][0]["to"]["username"], "asha");
}

#[test]
fn test_settled_group_yields_empty_plan() {
    let ledger = trip();
    let plan = SettlementPlanner::default().plan(&ledger);

    assert!(plan.before_graph.is_empty());
    assert!(plan.transactions.is_empty());
    assert_eq!(plan.optimization.reduction_percent, Decimal::ZERO);
    assert_eq!(plan.member_balances.len(), 4);
}
