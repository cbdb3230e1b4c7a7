//! Bounded per-date history of instrument summaries.
//!
//! Backed by an ordered map keyed on `%Y-%m-%d` strings, so lexicographic
//! key order is chronological order and the retention cap is enforced by
//! popping the smallest keys. Appending an existing date replaces it, which
//! makes a same-day re-run idempotent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::summary::InstrumentSummary;

/// Default number of distinct dates retained.
pub const DEFAULT_MAX_DAYS: usize = 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStore {
    days: BTreeMap<String, Vec<InstrumentSummary>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Retained date keys, oldest first.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.days.keys().map(String::as_str)
    }

    pub fn get(&self, date_key: &str) -> Option<&[InstrumentSummary]> {
        self.days.get(date_key).map(Vec::as_slice)
    }

    /// Insert or replace the entry for `date_key`.
    pub fn append(&mut self, date_key: impl Into<String>, summaries: Vec<InstrumentSummary>) {
        self.days.insert(date_key.into(), summaries);
    }

    /// Drop whole entries, smallest (oldest) keys first, until at most
    /// `max_entries` remain.
    pub fn prune(&mut self, max_entries: usize) {
        while self.days.len() > max_entries {
            self.days.pop_first();
        }
    }

    /// The single caller-facing mutation: append today's entry, then
    /// enforce the cap.
    pub fn append_and_prune(
        &mut self,
        date_key: impl Into<String>,
        summaries: Vec<InstrumentSummary>,
        max_entries: usize,
    ) {
        self.append(date_key, summaries);
        self.prune(max_entries);
    }
}
