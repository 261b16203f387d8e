//! Plain-text household report

use crate::{
    allocation::{
        personal_budget_total, planned_monthly_budget_total, segment_current_amounts,
        segment_drift, segment_target_amounts, total_net_assets,
    },
    models::FinanceSnapshot,
    money::format_currency,
};

/// Render the multi-line report for a snapshot
///
/// Segment lines are ordered by absolute drift, largest first; equal drifts
/// keep segment-name order. The output has no trailing newline.
pub fn render_report(snapshot: &FinanceSnapshot) -> String {
    let targets = segment_target_amounts(snapshot);
    let current = segment_current_amounts(snapshot);

    let mut ranked: Vec<_> = segment_drift(snapshot).into_iter().collect();
    ranked.sort_by(|(_, a), (_, b)| b.abs().cmp(&a.abs()));

    let mut lines = vec![
        format!(
            "Household: {} ({})",
            snapshot.household.name, snapshot.household.id
        ),
        format!(
            "Members: {} | Accounts: {}",
            snapshot.household.members.len(),
            snapshot.accounts.len()
        ),
        format!(
            "Total net assets: {}",
            format_currency(total_net_assets(snapshot))
        ),
        String::new(),
        format!("Budget period: {}", snapshot.budget.period),
        format!(
            "Shared required: {}",
            format_currency(snapshot.budget.shared_required)
        ),
        format!(
            "Shared flexible: {}",
            format_currency(snapshot.budget.shared_flexible)
        ),
        format!(
            "Personal discretionary total: {}",
            format_currency(personal_budget_total(snapshot))
        ),
        format!(
            "Planned monthly total: {}",
            format_currency(planned_monthly_budget_total(snapshot))
        ),
        String::new(),
        "Segment allocations:".to_string(),
    ];

    for (segment, drift) in ranked {
        lines.push(format!(
            "- {}: current={}, target={}, drift={}",
            segment,
            format_currency(current.get(&segment).copied().unwrap_or_default()),
            format_currency(targets.get(&segment).copied().unwrap_or_default()),
            format_currency(drift)
        ));
    }

    lines.join("\n")
}
