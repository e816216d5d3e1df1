//! Analytics sinks for trial lifecycle events
//!
//! Emission is fire-and-forget: a sink never reports failure back to the
//! trial manager. Sinks that can fail log the problem and move on.

use crate::clock::Clock;
use crate::models::TrialEvent;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Receives trial events
pub trait AnalyticsSink {
    fn track(&self, event: &TrialEvent);
}

impl<A: AnalyticsSink + ?Sized> AnalyticsSink for Box<A> {
    fn track(&self, event: &TrialEvent) {
        (**self).track(event)
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn track(&self, _event: &TrialEvent) {}
}

/// Keeps events in memory
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<TrialEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything tracked so far
    pub fn events(&self) -> Vec<TrialEvent> {
        self.lock().clone()
    }

    /// Number of tracked events named `name`
    pub fn count(&self, name: &str) -> usize {
        self.lock().iter().filter(|e| e.name() == name).count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TrialEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AnalyticsSink for RecordingSink {
    fn track(&self, event: &TrialEvent) {
        self.lock().push(event.clone());
    }
}

/// One line of a JSONL analytics log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordedEvent {
    pub event: String,
    pub payload: Map<String, Value>,
    pub recorded_at: DateTime<Utc>,
}

impl RecordedEvent {
    pub fn from_event(event: &TrialEvent, recorded_at: DateTime<Utc>) -> Self {
        Self {
            event: event.name().to_string(),
            payload: event.payload(),
            recorded_at,
        }
    }
}

/// Appends each event as a JSON line to a local file
///
/// `recorded_at` comes from the sink's clock, so a pinned clock stamps the
/// log with the same instant the trial was evaluated at.
pub struct JsonlSink {
    path: PathBuf,
    clock: Box<dyn Clock>,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>, clock: impl Clock + 'static) -> Self {
        Self {
            path: path.into(),
            clock: Box::new(clock),
        }
    }

    fn append(&self, record: &RecordedEvent) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

impl AnalyticsSink for JsonlSink {
    fn track(&self, event: &TrialEvent) {
        let record = RecordedEvent::from_event(event, self.clock.now());
        match self.append(&record) {
            Ok(()) => tracing::info!(event = event.name(), trial_id = event.trial_id(), "analytics event recorded"),
            Err(e) => tracing::warn!(event = event.name(), error = %e, "failed to record analytics event"),
        }
    }
}

/// Read the last `limit` events of a JSONL log (all when `None`)
///
/// Lines that do not parse are skipped with a warning.
pub fn read_jsonl(path: &Path, limit: Option<usize>) -> Result<Vec<RecordedEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut events = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RecordedEvent>(line) {
            Ok(event) => events.push(event),
            Err(e) => tracing::warn!(line = index + 1, error = %e, "skipping malformed analytics line"),
        }
    }

    if let Some(limit) = limit {
        let skip = events.len().saturating_sub(limit);
        events.drain(..skip);
    }

    Ok(events)
}
