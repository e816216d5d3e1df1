//! Milestone reconciliation

use crate::models::{Milestone, MilestoneSet, TrialEvent, TrialRecord, TrialStatus};

/// Events for milestones crossed by `status` that `emitted` has not seen yet
///
/// Pure: the caller marks the returned milestones and forwards the events.
/// Order is `24h_left` before `expired`.
pub fn reconcile_milestones(
    record: &TrialRecord,
    status: &TrialStatus,
    emitted: &MilestoneSet,
) -> Vec<TrialEvent> {
    Milestone::ALL
        .into_iter()
        .filter(|milestone| !emitted.is_emitted(*milestone) && is_crossed(*milestone, status))
        .map(|milestone| TrialEvent::milestone(milestone, record, status))
        .collect()
}

fn is_crossed(milestone: Milestone, status: &TrialStatus) -> bool {
    match milestone {
        Milestone::HoursLeft24 => status.hours_remaining > 0 && status.hours_remaining <= 24,
        Milestone::Expired => status.is_expired,
    }
}
