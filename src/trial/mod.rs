//! Trial window lifecycle
//!
//! Status and milestone logic are pure functions over a [`TrialRecord`] and
//! an instant; [`TrialManager`] composes them with storage and analytics:
//! - `compute_status` derives expiry, activity and remaining time
//! - `reconcile_milestones` lists one-shot events not yet emitted
//! - `TrialManager` persists state and forwards events
//!
//! [`TrialRecord`]: crate::models::TrialRecord

mod manager;
mod milestones;
mod status;

pub use manager::{TrialKeys, TrialManager, DEFAULT_NAMESPACE};
pub use milestones::reconcile_milestones;
pub use status::compute_status;
