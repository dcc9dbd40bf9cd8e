//! In-memory history of completed stopwatch sessions.

use std::sync::{Arc, RwLock};

use log::debug;
use serde::Serialize;

use crate::models::LogEntry;

/// Aggregates over the logged sessions, for the statistics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    pub count: usize,
    pub total_secs: u64,
    pub average_secs: u64,
}

/// Ordered collection of logged sessions, most recent first.
///
/// Cheap-clone handle over shared interior; every view that needs the
/// history receives its own clone rather than reaching for ambient shared
/// state. Entries live for the lifetime of the process only — losing them
/// on restart is expected behavior, not a bug.
#[derive(Clone, Default)]
pub struct SessionLog {
    inner: Arc<RwLock<Vec<LogEntry>>>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends so the history view reads newest to oldest.
    pub fn append(&self, entry: LogEntry) {
        let mut entries = self.inner.write().unwrap();
        entries.insert(0, entry);
    }

    /// Removes at most one entry. Unknown ids are ignored.
    pub fn remove(&self, id: &str) {
        let mut entries = self.inner.write().unwrap();
        match entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                entries.remove(index);
            }
            None => debug!("remove ignored: no logged session with id {}", id),
        }
    }

    pub fn clear(&self) {
        self.inner.write().unwrap().clear();
    }

    /// Snapshot of the history, newest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }

    pub fn total_secs(&self) -> u64 {
        self.inner
            .read()
            .unwrap()
            .iter()
            .map(|entry| entry.duration_secs)
            .sum()
    }

    pub fn stats(&self) -> LogStats {
        let entries = self.inner.read().unwrap();
        let count = entries.len();
        let total_secs: u64 = entries.iter().map(|entry| entry.duration_secs).sum();
        let average_secs = if count == 0 {
            0
        } else {
            total_secs / count as u64
        };
        LogStats {
            count,
            total_secs,
            average_secs,
        }
    }
}
