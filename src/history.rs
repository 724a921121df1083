//! Bounded per-url log of recent probe results

use serde::{Serialize, Serializer};
use std::collections::VecDeque;

use crate::models::ProbeResult;

pub const HISTORY_CAPACITY: usize = 50;

/// Oldest-first ring of probe results; appending past capacity drops the oldest entry.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    entries: VecDeque<ProbeResult>,
    capacity: usize,
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl HistoryRing {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, result: ProbeResult) {
        self.entries.push_back(result);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn snapshot(&self) -> Vec<ProbeResult> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for HistoryRing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}
