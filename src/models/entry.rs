use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed stopwatch session, frozen at the moment it was logged.
///
/// `formatted_duration` is rendered once with the display format that was
/// active when the session was logged and never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub duration_secs: u64,
    pub formatted_duration: String,
}

impl LogEntry {
    pub fn new(started_at: DateTime<Utc>, duration_secs: u64, formatted_duration: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at,
            duration_secs,
            formatted_duration,
        }
    }
}
