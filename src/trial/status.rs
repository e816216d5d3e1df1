//! Pure status derivation

use crate::models::{TrialRecord, TrialStatus};
use chrono::{DateTime, Duration, Utc};

/// Derive the status of `record` at `now`
///
/// - expired iff `now > trial_end` (at exactly `trial_end` the trial is still open)
/// - active iff not expired and not explicitly ended
/// - remaining days/hours round up and never go below zero
pub fn compute_status(record: &TrialRecord, now: DateTime<Utc>) -> TrialStatus {
    let is_expired = now > record.trial_end;
    let remaining = record.trial_end - now;

    TrialStatus {
        trial_id: record.id.clone(),
        is_active: !is_expired && record.has_active_trial,
        is_expired,
        days_remaining: ceil_units(remaining, Duration::days(1)),
        hours_remaining: ceil_units(remaining, Duration::hours(1)),
        trial_start: record.trial_start,
        trial_end: record.trial_end,
        computed_at: now,
    }
}

/// Number of whole-or-partial `unit`s in `remaining`, floored at zero
fn ceil_units(remaining: Duration, unit: Duration) -> u64 {
    if remaining <= Duration::zero() {
        return 0;
    }

    let unit_ms = unit.num_milliseconds();
    let whole = remaining.num_milliseconds() / unit_ms;
    let covered = Duration::milliseconds(whole * unit_ms);

    let units = if remaining > covered { whole + 1 } else { whole };
    units as u64
}
