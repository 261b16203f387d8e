//! Household allocation planner
//!
//! Pure functions that turn a [`FinanceSnapshot`] (households, accounts,
//! budget and asset segments) into net worth, per-segment target and
//! current amounts, drift, a planned monthly budget total, and a text
//! report. Nothing here touches storage.

pub mod allocation;
pub mod error;
pub mod models;
pub mod money;
pub mod parse;
pub mod report;

pub use allocation::{
    PlanSummary, SegmentAmounts, personal_budget_total, planned_monthly_budget_total,
    segment_current_amounts, segment_drift, segment_target_amounts, summarize, total_net_assets,
};
pub use error::{ParseError, ParseResult};
pub use models::{
    Account, AssetSegment, Budget, DEFAULT_SEGMENT, FinanceSnapshot, Household, HouseholdMember,
};
pub use money::format_currency;
pub use parse::parse_snapshot;
pub use report::render_report;
