//! Transaction model and related functionality

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Sign applied to the account balance
    pub fn signed(self, minor: i64) -> i64 {
        match self {
            TransactionKind::Income => minor,
            TransactionKind::Expense => -minor,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    /// Only the exact lowercase names are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction kind: {}", other)),
        }
    }
}

/// Transaction entity; immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagedTransaction {
    pub id: i64,
    pub user_id: i64,
    pub account_id: i64,
    pub kind: TransactionKind,
    /// Always positive; `kind` carries the direction
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// New transaction creation payload
///
/// `kind` stays a string so that unknown kinds reach validation instead of
/// failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub account_id: i64,
    pub kind: String,
    pub amount: Decimal,
    pub description: String,
}
