// trialkeeper - Trial window and entitlement lifecycle
// Tracks a fixed-length trial, gates access on it and reports milestones to analytics

pub mod analytics;
pub mod cli;
pub mod clock;
pub mod config;
pub mod logging;
pub mod models;
pub mod storage;
pub mod trial;

pub use anyhow::{Context, Result};

// Re-export commonly used types
pub use analytics::{AnalyticsSink, JsonlSink, NullSink, RecordingSink};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TrialkeeperConfig;
pub use models::{Milestone, MilestoneSet, TrialEvent, TrialRecord, TrialStatus};
pub use storage::{FileStore, KeyValueStore, Lookup, MemoryStore};
pub use trial::{compute_status, reconcile_milestones, TrialManager};
