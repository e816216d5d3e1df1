//! Trial record and derived status

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of every trial window, in days
pub const TRIAL_DURATION_DAYS: i64 = 3;

/// Length of every trial window
pub fn trial_duration() -> Duration {
    Duration::days(TRIAL_DURATION_DAYS)
}

/// Persisted trial window for one local principal
///
/// Bounds are fixed at creation. The only mutation a record ever sees is
/// `has_active_trial` going from `true` to `false`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrialRecord {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Start of the window (inclusive)
    pub trial_start: DateTime<Utc>,

    /// End of the window
    pub trial_end: DateTime<Utc>,

    /// Cleared by an explicit end, never set again
    pub has_active_trial: bool,
}

impl TrialRecord {
    /// Start a new trial window at `now`
    pub fn start_at(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            trial_start: now,
            trial_end: now + trial_duration(),
            has_active_trial: true,
        }
    }

    /// Bounds are ordered and the id is set
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty() && self.trial_end > self.trial_start
    }

    /// Mark the trial as explicitly ended
    pub fn end(&mut self) {
        self.has_active_trial = false;
    }
}

/// Status derived from a [`TrialRecord`] at a given instant
///
/// Recomputed on every query. A copy is mirrored to storage for display only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrialStatus {
    pub trial_id: String,
    pub is_active: bool,
    pub is_expired: bool,
    pub days_remaining: u64,
    pub hours_remaining: u64,
    pub trial_start: DateTime<Utc>,
    pub trial_end: DateTime<Utc>,

    /// Instant the status was computed for
    pub computed_at: DateTime<Utc>,
}

impl TrialStatus {
    /// Short label for display
    pub fn label(&self) -> &'static str {
        if self.is_expired {
            "expired"
        } else if self.is_active {
            "active"
        } else {
            "ended"
        }
    }
}
