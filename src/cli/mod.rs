//! Command implementations for the `trialkeeper` binary

pub mod access;
pub mod events;
pub mod lifecycle;
pub mod status;

use crate::analytics::JsonlSink;
use crate::clock::{Clock, ManualClock, SystemClock};
use crate::config::TrialkeeperConfig;
use crate::storage::FileStore;
use crate::trial::TrialManager;
use chrono::{DateTime, Utc};

/// Manager wired to on-disk state, the JSONL analytics log and a clock
pub type CliManager = TrialManager<FileStore, JsonlSink, Box<dyn Clock>>;

/// Build the manager for a command
///
/// `at` pins the clock to a fixed instant, to inspect the trial as it will
/// look later (or looked earlier).
pub fn open_manager(config: &TrialkeeperConfig, at: Option<DateTime<Utc>>) -> CliManager {
    TrialManager::new(
        FileStore::new(&config.data_dir),
        JsonlSink::new(config.analytics_log_path(), cli_clock(at)),
        cli_clock(at),
    )
    .with_namespace(&config.namespace)
}

fn cli_clock(at: Option<DateTime<Utc>>) -> Box<dyn Clock> {
    match at {
        Some(instant) => Box::new(ManualClock::new(instant)),
        None => Box::new(SystemClock),
    }
}
