//! Integration tests for the trial lifecycle
//!
//! Drives a TrialManager through time with a manual clock and checks the
//! status, gating and analytics it produces.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;
use trialkeeper::{
    FileStore, KeyValueStore, ManualClock, MemoryStore, Milestone, RecordingSink, TrialEvent,
    TrialManager,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 10, 8, 0, 0).unwrap()
}

// =========================================================================
// Full window walkthrough
// =========================================================================

#[test]
fn test_trial_walkthrough_49h_then_73h() {
    let sink = RecordingSink::new();
    let clock = ManualClock::new(t0());
    let mut manager = TrialManager::new(MemoryStore::new(), sink.clone(), clock.clone());

    let initial = manager.initialize_trial();
    assert!(initial.is_active);
    assert_eq!(initial.hours_remaining, 72);
    assert_eq!(initial.days_remaining, 3);

    // T0 + 49h: one day (23 hours) left
    clock.set(t0() + Duration::hours(49));
    let status = manager.get_trial_status().unwrap();
    assert!(!status.is_expired);
    assert_eq!(status.hours_remaining, 23);
    assert_eq!(status.days_remaining, 1);
    assert!(manager.has_gated_access());

    assert_eq!(sink.count("trial_24h_left"), 1);
    let warning = sink
        .events()
        .into_iter()
        .find(|e| e.name() == "trial_24h_left")
        .unwrap();
    assert_eq!(warning.payload()["hours_remaining"], json!(23));
    assert_eq!(warning.payload()["trial_end"], json!("2026-05-13T08:00:00.000Z"));

    // T0 + 73h: expired
    clock.set(t0() + Duration::hours(73));
    let status = manager.get_trial_status().unwrap();
    assert!(status.is_expired);
    assert!(!status.is_active);
    assert_eq!(status.hours_remaining, 0);
    assert_eq!(status.days_remaining, 0);
    assert!(!manager.has_gated_access());

    assert_eq!(sink.count("trial_expired"), 1);
    assert_eq!(sink.count("trial_24h_left"), 1);

    let names: Vec<&str> = sink.events().iter().map(TrialEvent::name).collect();
    assert_eq!(names, vec!["trial_start", "trial_24h_left", "trial_expired"]);
}

#[test]
fn test_hourly_polling_emits_each_milestone_once() {
    let sink = RecordingSink::new();
    let clock = ManualClock::new(t0());
    let mut manager = TrialManager::new(MemoryStore::new(), sink.clone(), clock.clone());
    manager.get_or_create_trial();

    let mut previous = manager.get_trial_status().unwrap();
    for minute in (0..=(96 * 60)).step_by(20) {
        clock.set(t0() + Duration::minutes(minute));
        let status = manager.get_or_create_trial();

        assert_eq!(status.trial_id, previous.trial_id);
        assert!(status.hours_remaining <= previous.hours_remaining);
        assert!(status.days_remaining <= previous.days_remaining);
        assert_eq!(status.is_expired, clock_now(&clock) > status.trial_end);
        previous = status;
    }

    assert_eq!(sink.count("trial_start"), 1);
    assert_eq!(sink.count("trial_24h_left"), 1);
    assert_eq!(sink.count("trial_expired"), 1);
    assert_eq!(
        manager.milestones().emitted(),
        vec![Milestone::HoursLeft24, Milestone::Expired]
    );
}

fn clock_now(clock: &ManualClock) -> DateTime<Utc> {
    use trialkeeper::Clock;
    clock.now()
}

// =========================================================================
// Persistence across instances
// =========================================================================

#[test]
fn test_file_store_survives_restart() {
    let temp = TempDir::new().unwrap();
    let sink = RecordingSink::new();
    let clock = ManualClock::new(t0());

    let trial_id = {
        let mut manager = TrialManager::new(FileStore::new(temp.path()), sink.clone(), clock.clone());
        manager.get_or_create_trial().trial_id
    };

    clock.advance(Duration::hours(50));

    // Fresh manager over the same directory, as after a reload
    let mut manager = TrialManager::new(FileStore::new(temp.path()), sink.clone(), clock.clone());
    let status = manager.get_or_create_trial();
    assert_eq!(status.trial_id, trial_id);
    assert_eq!(status.hours_remaining, 22);
    assert_eq!(sink.count("trial_start"), 1);
    assert_eq!(sink.count("trial_24h_left"), 1);

    // The milestone flag was persisted too
    let mut manager = TrialManager::new(FileStore::new(temp.path()), sink.clone(), clock.clone());
    manager.get_trial_status();
    assert_eq!(sink.count("trial_24h_left"), 1);

    let raw = FileStore::new(temp.path())
        .get("trialkeeper.trial")
        .unwrap()
        .unwrap();
    let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(record["trialStart"], json!("2026-05-10T08:00:00Z"));
    assert_eq!(record["hasActiveTrial"], json!(true));
}

#[test]
fn test_corrupted_file_is_treated_as_no_trial() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("trialkeeper.trial.json"), "\u{0}\u{1}garbage").unwrap();

    let sink = RecordingSink::new();
    let mut manager = TrialManager::new(FileStore::new(temp.path()), sink.clone(), ManualClock::new(t0()));

    assert!(manager.get_trial_status().is_none());
    assert!(!manager.has_gated_access());

    let status = manager.get_or_create_trial();
    assert!(status.is_active);
    assert_eq!(sink.count("trial_start"), 1);
}

// =========================================================================
// End and reset
// =========================================================================

#[test]
fn test_end_then_reset_then_new_trial() {
    let sink = RecordingSink::new();
    let clock = ManualClock::new(t0());
    let mut manager = TrialManager::new(MemoryStore::new(), sink.clone(), clock.clone());

    let first = manager.get_or_create_trial();
    clock.advance(Duration::hours(2));
    manager.end_trial();

    let ended = manager.get_trial_status().unwrap();
    assert_eq!(ended.trial_id, first.trial_id);
    assert!(!ended.is_expired);
    assert!(!ended.is_active);
    assert!(!manager.has_gated_access());

    // get-or-create keeps the ended trial rather than granting a new one
    assert_eq!(manager.get_or_create_trial().trial_id, first.trial_id);

    manager.reset_trial();
    assert!(manager.get_trial_status().is_none());

    let second = manager.get_or_create_trial();
    assert_ne!(second.trial_id, first.trial_id);
    assert!(manager.has_gated_access());

    assert_eq!(sink.count("trial_ended_manually"), 1);
    assert_eq!(sink.count("trial_start"), 2);
}
