//! TrialManager - trial lifecycle over an injected store, sink and clock

use super::{compute_status, reconcile_milestones};
use crate::analytics::AnalyticsSink;
use crate::clock::Clock;
use crate::models::{MilestoneSet, TrialEvent, TrialRecord, TrialStatus};
use crate::storage::{load_json, KeyValueStore, Lookup};
use serde::Serialize;

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "trialkeeper";

/// Storage keys for one trial namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialKeys {
    /// Canonical trial record
    pub record: String,
    /// Display-cache mirror of the last computed status
    pub status: String,
    /// Emitted milestone flags
    pub milestones: String,
}

impl TrialKeys {
    pub fn new(namespace: &str) -> Self {
        Self {
            record: format!("{}.trial", namespace),
            status: format!("{}.status", namespace),
            milestones: format!("{}.milestones", namespace),
        }
    }
}

impl Default for TrialKeys {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

/// Owns the trial record for one local principal
///
/// Every operation completes synchronously and never fails: unreadable state
/// reads as "no trial", and storage write failures are logged while the call
/// carries on with its in-memory result.
pub struct TrialManager<S, A, C> {
    store: S,
    analytics: A,
    clock: C,
    keys: TrialKeys,
    /// Milestones emitted by this manager, keyed by trial id. Survives a
    /// failed write of the persisted set.
    emitted: Option<(String, MilestoneSet)>,
}

impl<S, A, C> TrialManager<S, A, C>
where
    S: KeyValueStore,
    A: AnalyticsSink,
    C: Clock,
{
    pub fn new(store: S, analytics: A, clock: C) -> Self {
        Self {
            store,
            analytics,
            clock,
            keys: TrialKeys::default(),
            emitted: None,
        }
    }

    /// Use a different key namespace
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.keys = TrialKeys::new(namespace);
        self
    }

    pub fn keys(&self) -> &TrialKeys {
        &self.keys
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start a brand-new trial window at the current instant
    ///
    /// Overwrites any existing record. Milestone flags belong to the record
    /// they were emitted for, so the new record starts with none: otherwise a
    /// restarted trial would never announce its own 24h-left or expiry.
    /// Callers that only want to ensure a trial exists should use
    /// [`Self::get_or_create_trial`].
    pub fn initialize_trial(&mut self) -> TrialStatus {
        let now = self.clock.now();
        let record = TrialRecord::start_at(now);
        tracing::debug!(trial_id = %record.id, trial_end = %record.trial_end, "initializing trial");

        write_json(&mut self.store, &self.keys.record, &record);
        remove_key(&mut self.store, &self.keys.milestones);
        self.emitted = None;

        let status = compute_status(&record, now);
        write_json(&mut self.store, &self.keys.status, &status);

        self.emit(&TrialEvent::started(&record));
        status
    }

    /// Current status, `None` if no usable trial record exists
    ///
    /// Never creates a record. Refreshes the display cache and emits any
    /// milestone crossed since the last call.
    pub fn get_trial_status(&mut self) -> Option<TrialStatus> {
        let record = self.load_record()?;
        let status = compute_status(&record, self.clock.now());

        write_json(&mut self.store, &self.keys.status, &status);
        self.reconcile(&record, &status);

        Some(status)
    }

    /// Whether gated features are available right now
    pub fn has_gated_access(&mut self) -> bool {
        self.get_trial_status()
            .map(|status| status.is_active)
            .unwrap_or(false)
    }

    /// Explicitly end the current trial
    ///
    /// The record is kept with `has_active_trial = false`. With no record
    /// there is nothing to end and no event is emitted.
    pub fn end_trial(&mut self) {
        let Some(mut record) = self.load_record() else {
            tracing::debug!("end requested but no trial exists");
            return;
        };

        record.end();
        write_json(&mut self.store, &self.keys.record, &record);

        let status = compute_status(&record, self.clock.now());
        write_json(&mut self.store, &self.keys.status, &status);

        self.emit(&TrialEvent::EndedManually {
            trial_id: record.id.clone(),
            ended_at: status.computed_at,
        });
    }

    /// Erase the record, display cache and milestone flags
    pub fn reset_trial(&mut self) {
        tracing::debug!("resetting trial state");
        remove_key(&mut self.store, &self.keys.record);
        remove_key(&mut self.store, &self.keys.status);
        remove_key(&mut self.store, &self.keys.milestones);
        self.emitted = None;
    }

    /// Status of the existing trial, starting one if none exists
    pub fn get_or_create_trial(&mut self) -> TrialStatus {
        match self.get_trial_status() {
            Some(status) => status,
            None => self.initialize_trial(),
        }
    }

    // =========================================================================
    // Read-only accessors
    // =========================================================================

    /// Last status mirrored to the display cache, without recomputation
    pub fn cached_status(&self) -> Option<TrialStatus> {
        match load_json::<TrialStatus, _>(&self.store, &self.keys.status) {
            Lookup::Present(status) => Some(status),
            Lookup::Absent => None,
            Lookup::Malformed(reason) => {
                tracing::warn!(%reason, "ignoring unreadable status cache");
                None
            }
        }
    }

    /// Canonical trial record, if one is stored and readable
    pub fn trial_record(&self) -> Option<TrialRecord> {
        self.load_record()
    }

    /// Milestones already emitted for the current record
    pub fn milestones(&self) -> MilestoneSet {
        match load_json::<MilestoneSet, _>(&self.store, &self.keys.milestones) {
            Lookup::Present(set) => set,
            Lookup::Absent => MilestoneSet::new(),
            Lookup::Malformed(reason) => {
                tracing::warn!(%reason, "treating unreadable milestone set as empty");
                MilestoneSet::new()
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// The one place where malformed state becomes "no trial"
    fn load_record(&self) -> Option<TrialRecord> {
        match load_json::<TrialRecord, _>(&self.store, &self.keys.record) {
            Lookup::Present(record) if record.is_well_formed() => Some(record),
            Lookup::Present(record) => {
                tracing::warn!(
                    trial_id = %record.id,
                    trial_start = %record.trial_start,
                    trial_end = %record.trial_end,
                    "ignoring trial record with invalid bounds"
                );
                None
            }
            Lookup::Absent => None,
            Lookup::Malformed(reason) => {
                tracing::warn!(%reason, "ignoring unreadable trial record");
                None
            }
        }
    }

    fn reconcile(&mut self, record: &TrialRecord, status: &TrialStatus) {
        let mut emitted = self.milestones();
        if let Some((trial_id, session)) = &self.emitted {
            if *trial_id == record.id {
                emitted.merge(session);
            }
        }

        let events = reconcile_milestones(record, status, &emitted);
        if events.is_empty() {
            return;
        }

        for milestone in events.iter().filter_map(TrialEvent::as_milestone) {
            emitted.mark(milestone);
        }
        write_json(&mut self.store, &self.keys.milestones, &emitted);
        self.emitted = Some((record.id.clone(), emitted));

        for event in &events {
            self.emit(event);
        }
    }

    fn emit(&self, event: &TrialEvent) {
        tracing::debug!(event = event.name(), trial_id = event.trial_id(), "emitting trial event");
        self.analytics.track(event);
    }
}

/// Best-effort write; failures are logged and swallowed
fn write_json<S, T>(store: &mut S, key: &str, value: &T)
where
    S: KeyValueStore,
    T: Serialize,
{
    let content = match serde_json::to_string(value) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to serialize trial state");
            return;
        }
    };

    if let Err(e) = store.set(key, &content) {
        tracing::warn!(key, error = %e, "failed to persist trial state");
    }
}

fn remove_key<S: KeyValueStore>(store: &mut S, key: &str) {
    if let Err(e) = store.delete(key) {
        tracing::warn!(key, error = %e, "failed to delete trial state");
    }
}

// =============================================================================
// Tests
// =============================================================================
