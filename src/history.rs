//! Cycle event history for diagnostics.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::runtime::Instant;
use crate::types::LightId;

/// Kind of event recorded in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// A light's prior state was written back.
    Restored,
    /// A restore failed and the prior state was kept.
    Unavailable,
    /// A light was removed from the store.
    Dropped,
    /// The light listing failed and the cycle was skipped.
    FetchFailed,
}

/// A recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub event: EventType,
    pub light: Option<LightId>,
    /// Seconds since history creation
    pub timestamp: f64,
}

/// Bounded log of what the reconcile loop did.
#[derive(Debug, Clone)]
pub struct CycleHistory {
    counts: HashMap<EventType, usize>,
    cycles: usize,
    last_error: Option<String>,
    start_time: Instant,
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for CycleHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            cycles: 0,
            last_error: None,
            start_time: Instant::now(),
            entries: VecDeque::new(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    /// Count one completed or skipped cycle.
    pub fn record_cycle(&mut self) {
        self.cycles += 1;
    }

    pub fn record(&mut self, event: EventType, light: Option<&LightId>) {
        *self.counts.entry(event).or_default() += 1;

        self.entries.push_back(HistoryEntry {
            event,
            light: light.cloned(),
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });

        if self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn record_error(&mut self, error: &str) {
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.entries.clear();
        self.cycles = 0;
        self.last_error = None;
    }

    pub fn summary(&self) -> HistorySummary {
        let count = |t: EventType| self.counts.get(&t).copied().unwrap_or(0);
        HistorySummary {
            cycles: self.cycles,
            restored: count(EventType::Restored),
            unavailable: count(EventType::Unavailable),
            dropped: count(EventType::Dropped),
            fetch_failed: count(EventType::FetchFailed),
            total_entries: self.entries.len(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Summary of the history for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub cycles: usize,
    pub restored: usize,
    pub unavailable: usize,
    pub dropped: usize,
    pub fetch_failed: usize,
    pub total_entries: usize,
    pub last_error: Option<String>,
}
