pub mod event;
pub mod milestone;
pub mod trial;

pub use event::TrialEvent;
pub use milestone::{Milestone, MilestoneSet};
pub use trial::{trial_duration, TrialRecord, TrialStatus, TRIAL_DURATION_DAYS};
