//! Account model and related functionality

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account owned by a single user
///
/// `balance` only ever changes as a side effect of recording a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagedAccount {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub account_type: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

/// New account creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub account_type: String,
    #[serde(default)]
    pub opening_balance: Decimal,
}
