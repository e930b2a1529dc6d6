//! Core types for the group ledger
//!
//! Amounts are exact [`Decimal`] values at cent scale. Floating point never
//! touches money.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Create new user ID
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw value
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Net position per user.
///
/// Positive: the group owes this user. Negative: this user owes the group.
pub type Balances = BTreeMap<UserId, Decimal>;

/// Public identity attached to ids in responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID
    pub user_id: UserId,

    /// Display name
    pub username: String,

    /// Contact email
    #[serde(default)]
    pub email: String,
}

impl UserProfile {
    /// Create new profile
    pub fn new(user_id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Placeholder for an id with no active membership
    pub fn unknown(user_id: UserId) -> Self {
        Self::new(user_id, "Unknown", "")
    }
}

/// Group membership
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Member profile
    pub user: UserProfile,

    /// Inactive members keep their history but leave every derivation
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Member {
    /// Active membership
    pub fn active(user: UserProfile) -> Self {
        Self {
            user,
            is_active: true,
        }
    }

    /// Member user ID
    pub fn user_id(&self) -> UserId {
        self.user.user_id
    }
}

/// One participant's share of an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSplit {
    /// Participant
    pub user_id: UserId,

    /// Amount owed to the payer
    pub share_amount: Decimal,
}

/// Shared expense paid by one member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupExpense {
    /// Expense ID
    pub expense_id: u64,

    /// Title
    pub title: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Total amount paid
    pub amount: Decimal,

    /// Payer
    pub paid_by: UserId,

    /// Split lines
    pub splits: Vec<ExpenseSplit>,

    /// Soft-delete flag
    #[serde(default)]
    pub is_deleted: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Payer and split lines of one expense, the input of debt graph construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseShares {
    /// Payer
    pub payer: UserId,

    /// Split lines
    pub splits: Vec<ExpenseSplit>,
}

impl From<&GroupExpense> for ExpenseShares {
    fn from(expense: &GroupExpense) -> Self {
        Self {
            payer: expense.paid_by,
            splits: expense.splits.clone(),
        }
    }
}

/// Recorded payment between two members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRecord {
    /// Settlement ID
    pub settlement_id: u64,

    /// Paying user
    pub paid_by: UserId,

    /// Receiving user
    pub paid_to: UserId,

    /// Amount paid
    pub amount: Decimal,

    /// Marked complete by payer or payee
    #[serde(default)]
    pub is_completed: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Payment instruction to be confirmed into the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementTransfer {
    /// Paying user
    pub from_user_id: UserId,

    /// Receiving user
    pub to_user_id: UserId,

    /// Amount
    pub amount: Decimal,
}

/// Member balance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStatus {
    /// Others owe this member
    #[serde(rename = "gets back")]
    GetsBack,
    /// This member owes others
    #[serde(rename = "owes")]
    Owes,
    /// Nothing outstanding
    #[serde(rename = "settled")]
    Settled,
}

impl BalanceStatus {
    /// Classify a balance against a settled tolerance
    pub fn classify(balance: Decimal, tolerance: Decimal) -> Self {
        if balance > tolerance {
            BalanceStatus::GetsBack
        } else if balance < -tolerance {
            BalanceStatus::Owes
        } else {
            BalanceStatus::Settled
        }
    }
}

/// Member with derived balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBalance {
    /// Member profile
    pub user: UserProfile,

    /// Net balance, rounded to cents
    pub balance: Decimal,

    /// Balance status
    pub status: BalanceStatus,
}

/// Past settlements of a group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementHistory {
    /// Group ID
    pub group_id: u64,

    /// Records, newest first
    pub settlements: Vec<SettlementRecord>,

    /// Number of records
    pub total_settlements: usize,

    /// Sum of all recorded amounts, rounded to cents
    pub total_amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_status() {
        let tolerance = dec!(0.005);
        assert_eq!(BalanceStatus::classify(dec!(12.50), tolerance), BalanceStatus::GetsBack);
        assert_eq!(BalanceStatus::classify(dec!(-0.01), tolerance), BalanceStatus::Owes);
        assert_eq!(BalanceStatus::classify(dec!(0.004), tolerance), BalanceStatus::Settled);
        assert_eq!(BalanceStatus::classify(Decimal::ZERO, tolerance), BalanceStatus::Settled);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&BalanceStatus::GetsBack).unwrap();
        assert_eq!(json, "\"gets back\"");
    }

    #[test]
    fn test_unknown_profile() {
        let profile = UserProfile::unknown(UserId::new(42));
        assert_eq!(profile.username, "Unknown");
        assert!(profile.email.is_empty());
    }
}
