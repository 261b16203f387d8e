//! Strict JSON reader for finance snapshots

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::{
    allocation::fits_decimal_range,
    error::{ParseError, ParseResult},
    models::{Account, AssetSegment, Budget, FinanceSnapshot, Household, default_allocation},
};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotDocument {
    household: Household,
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    budget: BudgetDocument,
    #[serde(default)]
    asset_segments: Vec<AssetSegment>,
    #[serde(default)]
    account_segment_allocations: BTreeMap<String, BTreeMap<String, Decimal>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BudgetDocument {
    #[serde(default = "unknown_period")]
    period: String,
    #[serde(default)]
    shared: SharedBudgetDocument,
    #[serde(default)]
    personal: BTreeMap<String, Decimal>,
}

impl Default for BudgetDocument {
    fn default() -> Self {
        Self {
            period: unknown_period(),
            shared: SharedBudgetDocument::default(),
            personal: BTreeMap::new(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SharedBudgetDocument {
    #[serde(default)]
    required: Decimal,
    #[serde(default)]
    flexible: Decimal,
}

fn unknown_period() -> String {
    Budget::default().period
}

/// Parse a JSON snapshot payload
///
/// Optional sections fall back to empty defaults. Every account without an
/// entry in `account_segment_allocations` is allocated 100% to the
/// `operations` segment here, so the returned snapshot is complete. Snapshots
/// whose totals or allocations would overflow `Decimal` are rejected, so every
/// figure in [`crate::allocation`] is exact for a parsed snapshot.
pub fn parse_snapshot(raw: &str) -> ParseResult<FinanceSnapshot> {
    let document: SnapshotDocument = serde_json::from_str(raw)?;

    if document.household.id.trim().is_empty() {
        return Err(ParseError::MissingField("household.id"));
    }
    if document.household.name.trim().is_empty() {
        return Err(ParseError::MissingField("household.name"));
    }

    let mut allocations: BTreeMap<String, BTreeMap<String, Decimal>> = document
        .accounts
        .iter()
        .map(|account| (account.id.clone(), default_allocation()))
        .collect();
    allocations.extend(document.account_segment_allocations);

    debug!(
        household = %document.household.id,
        accounts = document.accounts.len(),
        segments = document.asset_segments.len(),
        "Parsed finance snapshot"
    );

    let snapshot = FinanceSnapshot {
        household: document.household,
        accounts: document.accounts,
        budget: Budget {
            period: document.budget.period,
            shared_required: document.budget.shared.required,
            shared_flexible: document.budget.shared.flexible,
            personal: document.budget.personal,
        },
        asset_segments: document.asset_segments,
        account_segment_allocations: allocations,
    };

    if !fits_decimal_range(&snapshot) {
        return Err(ParseError::OutOfRange);
    }
    Ok(snapshot)
}
