//! Finance snapshot model
//!
//! A snapshot is built fresh from JSON for every calculation and never
//! persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Segment that receives any account without an explicit allocation
pub const DEFAULT_SEGMENT: &str = "operations";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HouseholdMember {
    pub user_id: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Household {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<HouseholdMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Account {
    pub id: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub owners: Vec<String>,
    pub balance: Decimal,
}

/// Monthly budget for the household
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    pub period: String,
    pub shared_required: Decimal,
    pub shared_flexible: Decimal,
    /// Discretionary amount per member, keyed by user id
    pub personal: BTreeMap<String, Decimal>,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            period: "unknown".to_string(),
            shared_required: Decimal::ZERO,
            shared_flexible: Decimal::ZERO,
            personal: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetSegment {
    pub name: String,
    pub target_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceSnapshot {
    pub household: Household,
    pub accounts: Vec<Account>,
    pub budget: Budget,
    pub asset_segments: Vec<AssetSegment>,
    /// account id -> segment name -> percentage of that account's balance
    pub account_segment_allocations: BTreeMap<String, BTreeMap<String, Decimal>>,
}

impl FinanceSnapshot {
    /// Allocation for an account, falling back to 100% in the default segment
    pub fn allocation_for(&self, account_id: &str) -> BTreeMap<String, Decimal> {
        self.account_segment_allocations
            .get(account_id)
            .cloned()
            .unwrap_or_else(default_allocation)
    }
}

pub(crate) fn default_allocation() -> BTreeMap<String, Decimal> {
    BTreeMap::from([(DEFAULT_SEGMENT.to_string(), Decimal::ONE_HUNDRED)])
}
