//! Net worth, segment allocation and budget arithmetic

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::FinanceSnapshot;

/// Amount per segment name
pub type SegmentAmounts = BTreeMap<String, Decimal>;

/// Every derived figure for a snapshot, ready to serialize
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub household_id: String,
    pub household_name: String,
    pub total_net_assets: Decimal,
    pub segment_targets: SegmentAmounts,
    pub segment_current: SegmentAmounts,
    pub segment_drift: SegmentAmounts,
    pub personal_budget_total: Decimal,
    pub planned_monthly_total: Decimal,
}

fn percent_of(amount: Decimal, pct: Decimal) -> Decimal {
    amount.saturating_mul(pct / Decimal::ONE_HUNDRED)
}

fn checked_percent_of(amount: Decimal, pct: Decimal) -> Option<Decimal> {
    amount.checked_mul(pct / Decimal::ONE_HUNDRED)
}

/// Sum of all account balances; negative balances reduce the total
pub fn total_net_assets(snapshot: &FinanceSnapshot) -> Decimal {
    snapshot
        .accounts
        .iter()
        .fold(Decimal::ZERO, |total, account| total.saturating_add(account.balance))
}

/// Target amount for every declared segment
pub fn segment_target_amounts(snapshot: &FinanceSnapshot) -> SegmentAmounts {
    let total = total_net_assets(snapshot);
    let mut targets = SegmentAmounts::new();
    for segment in &snapshot.asset_segments {
        targets.insert(segment.name.clone(), percent_of(total, segment.target_pct));
    }
    targets
}

/// Amount currently held per segment, following each account's allocation
///
/// Segments reached only through allocations are included even when they
/// are not declared in `asset_segments`.
pub fn segment_current_amounts(snapshot: &FinanceSnapshot) -> SegmentAmounts {
    let mut current = SegmentAmounts::new();
    for account in &snapshot.accounts {
        for (segment, pct) in snapshot.allocation_for(&account.id) {
            let held = current.entry(segment).or_default();
            *held = held.saturating_add(percent_of(account.balance, pct));
        }
    }
    current
}

/// `current - target` over every segment seen on either side
pub fn segment_drift(snapshot: &FinanceSnapshot) -> SegmentAmounts {
    let targets = segment_target_amounts(snapshot);
    let mut drift = segment_current_amounts(snapshot);
    for (segment, target) in targets {
        let amount = drift.entry(segment).or_default();
        *amount = amount.saturating_sub(target);
    }
    drift
}

pub fn personal_budget_total(snapshot: &FinanceSnapshot) -> Decimal {
    snapshot
        .budget
        .personal
        .values()
        .fold(Decimal::ZERO, |total, amount| total.saturating_add(*amount))
}

/// Shared required + shared flexible + every personal allowance
pub fn planned_monthly_budget_total(snapshot: &FinanceSnapshot) -> Decimal {
    snapshot
        .budget
        .shared_required
        .saturating_add(snapshot.budget.shared_flexible)
        .saturating_add(personal_budget_total(snapshot))
}

/// Whether every figure above can be computed without leaving the
/// `Decimal` range
///
/// Runs the same operations in the same order with checked arithmetic, so
/// a snapshot that passes never saturates.
pub(crate) fn fits_decimal_range(snapshot: &FinanceSnapshot) -> bool {
    checked_figures(snapshot).is_some()
}

fn checked_figures(snapshot: &FinanceSnapshot) -> Option<()> {
    let total = snapshot
        .accounts
        .iter()
        .try_fold(Decimal::ZERO, |total, account| total.checked_add(account.balance))?;

    let mut targets = SegmentAmounts::new();
    for segment in &snapshot.asset_segments {
        targets.insert(segment.name.clone(), checked_percent_of(total, segment.target_pct)?);
    }

    let mut current = SegmentAmounts::new();
    for account in &snapshot.accounts {
        for (segment, pct) in snapshot.allocation_for(&account.id) {
            let held = current.entry(segment).or_default();
            *held = held.checked_add(checked_percent_of(account.balance, pct)?)?;
        }
    }

    for (segment, target) in targets {
        let amount = current.entry(segment).or_default();
        *amount = amount.checked_sub(target)?;
    }

    let personal = snapshot
        .budget
        .personal
        .values()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(*amount))?;
    snapshot
        .budget
        .shared_required
        .checked_add(snapshot.budget.shared_flexible)?
        .checked_add(personal)?;

    Some(())
}

pub fn summarize(snapshot: &FinanceSnapshot) -> PlanSummary {
    PlanSummary {
        household_id: snapshot.household.id.clone(),
        household_name: snapshot.household.name.clone(),
        total_net_assets: total_net_assets(snapshot),
        segment_targets: segment_target_amounts(snapshot),
        segment_current: segment_current_amounts(snapshot),
        segment_drift: segment_drift(snapshot),
        personal_budget_total: personal_budget_total(snapshot),
        planned_monthly_total: planned_monthly_budget_total(snapshot),
    }
}
