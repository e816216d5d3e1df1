//! Analytics events emitted over a trial's lifecycle

use super::{Milestone, TrialRecord, TrialStatus, TRIAL_DURATION_DAYS};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

/// Event handed to an analytics sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialEvent {
    /// A new trial window was created
    Started {
        trial_id: String,
        trial_start: DateTime<Utc>,
        trial_end: DateTime<Utc>,
        duration_days: i64,
    },

    /// 24 hours or less remain
    HoursLeft24 {
        trial_id: String,
        hours_remaining: u64,
        trial_end: DateTime<Utc>,
    },

    /// The window closed
    Expired {
        trial_id: String,
        trial_start: DateTime<Utc>,
        trial_end: DateTime<Utc>,
    },

    /// The trial was ended explicitly before (or after) its window closed
    EndedManually {
        trial_id: String,
        ended_at: DateTime<Utc>,
    },
}

impl TrialEvent {
    pub fn started(record: &TrialRecord) -> Self {
        TrialEvent::Started {
            trial_id: record.id.clone(),
            trial_start: record.trial_start,
            trial_end: record.trial_end,
            duration_days: TRIAL_DURATION_DAYS,
        }
    }

    /// Event announcing that `milestone` has been crossed
    pub fn milestone(milestone: Milestone, record: &TrialRecord, status: &TrialStatus) -> Self {
        match milestone {
            Milestone::HoursLeft24 => TrialEvent::HoursLeft24 {
                trial_id: record.id.clone(),
                hours_remaining: status.hours_remaining,
                trial_end: record.trial_end,
            },
            Milestone::Expired => TrialEvent::Expired {
                trial_id: record.id.clone(),
                trial_start: record.trial_start,
                trial_end: record.trial_end,
            },
        }
    }

    /// Event name as seen by the analytics collaborator
    pub fn name(&self) -> &'static str {
        match self {
            TrialEvent::Started { .. } => "trial_start",
            TrialEvent::HoursLeft24 { .. } => "trial_24h_left",
            TrialEvent::Expired { .. } => "trial_expired",
            TrialEvent::EndedManually { .. } => "trial_ended_manually",
        }
    }

    /// Milestone this event marks, if any
    pub fn as_milestone(&self) -> Option<Milestone> {
        match self {
            TrialEvent::HoursLeft24 { .. } => Some(Milestone::HoursLeft24),
            TrialEvent::Expired { .. } => Some(Milestone::Expired),
            TrialEvent::Started { .. } | TrialEvent::EndedManually { .. } => None,
        }
    }

    pub fn trial_id(&self) -> &str {
        match self {
            TrialEvent::Started { trial_id, .. }
            | TrialEvent::HoursLeft24 { trial_id, .. }
            | TrialEvent::Expired { trial_id, .. }
            | TrialEvent::EndedManually { trial_id, .. } => trial_id,
        }
    }

    /// Flat string-keyed payload
    pub fn payload(&self) -> Map<String, Value> {
        let value = match self {
            TrialEvent::Started {
                trial_id,
                trial_start,
                trial_end,
                duration_days,
            } => json!({
                "trial_id": trial_id,
                "trial_start": iso(trial_start),
                "trial_end": iso(trial_end),
                "duration_days": duration_days,
            }),
            TrialEvent::HoursLeft24 {
                trial_id,
                hours_remaining,
                trial_end,
            } => json!({
                "trial_id": trial_id,
                "hours_remaining": hours_remaining,
                "trial_end": iso(trial_end),
            }),
            TrialEvent::Expired {
                trial_id,
                trial_start,
                trial_end,
            } => json!({
                "trial_id": trial_id,
                "trial_start": iso(trial_start),
                "trial_end": iso(trial_end),
            }),
            TrialEvent::EndedManually { trial_id, ended_at } => json!({
                "trial_id": trial_id,
                "ended_at": iso(ended_at),
            }),
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

fn iso(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
