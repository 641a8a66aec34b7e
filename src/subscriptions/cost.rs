//! Monthly cost aggregation over a user's subscriptions.
//!
//! Billing is in whole calendar months: any month a subscription touches
//! inside the query window is charged in full. Stored data is never
//! rejected here. Inverted or disjoint intervals simply contribute nothing.

use chrono::NaiveDate;

use super::dates::{max_date, min_date, months_spanned};
use super::models::{QueryWindow, SubscriptionRecord};

/// Total billed cost of `records` inside `window`.
///
/// `records` must already be narrowed to the window's user and service;
/// neither is re-checked. Input order does not affect the result. The sum
/// saturates at `i64::MAX` instead of overflowing.
pub fn total_cost(records: &[SubscriptionRecord], window: &QueryWindow) -> i64 {
    records
        .iter()
        .map(|record| record_cost(record, window.period_start, window.period_end))
        .fold(0i64, i64::saturating_add)
}

/// Contribution of a single record to the window `[period_start, period_end]`.
pub fn record_cost(
    record: &SubscriptionRecord,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> i64 {
    let months = billed_months(record, period_start, period_end);
    // negative prices only come from unvalidated rows
    i64::from(record.price.max(0)).saturating_mul(months)
}

/// Whole months of `record` billed inside `[period_start, period_end]`.
pub fn billed_months(
    record: &SubscriptionRecord,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> i64 {
    let effective_end = match record.end_date {
        Some(end) if end < period_end => end,
        _ => period_end,
    };

    let overlap_start = max_date(record.start_date, period_start);
    let overlap_end = min_date(effective_end, period_end);
    if overlap_start > overlap_end {
        return 0;
    }

    months_spanned(overlap_start, overlap_end)
}
