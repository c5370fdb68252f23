//! Sync log: one entry per sync attempt.
//!
//! Variants are added over time and never removed or reordered, since the
//! serialized `type` tag is persisted in `sync_log.payload`.

use crate::types::{SyncInstant, WorkgroupId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncEvent {
    /// Cache was fresh; the remote source was not contacted.
    CacheServed {
        workgroup_id: Option<WorkgroupId>,
        assignments: usize,
    },
    FetchSucceeded {
        workgroup_id: Option<WorkgroupId>,
        forced: bool,
        records: usize,
        people: usize,
        workgroups: usize,
        cache_written: bool,
    },
    /// Remote fetch failed; cached data (possibly empty) was served.
    FetchFailed {
        workgroup_id: Option<WorkgroupId>,
        forced: bool,
        reason: String,
        fallback_assignments: usize,
    },
}

impl SyncEvent {
    /// Stable name for the `event_type` column.
    pub fn type_name(&self) -> &'static str {
        match self {
            SyncEvent::CacheServed { .. } => "cache_served",
            SyncEvent::FetchSucceeded { .. } => "fetch_succeeded",
            SyncEvent::FetchFailed { .. } => "fetch_failed",
        }
    }
}

/// The sync log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncLogEntry {
    pub id: Option<i64>,
    pub sync_id: String,
    pub occurred_at: SyncInstant,
    pub event_type: String,
    pub payload: String, // JSON-serialized SyncEvent
}

impl SyncLogEntry {
    pub fn decode(&self) -> serde_json::Result<SyncEvent> {
        serde_json::from_str(&self.payload)
    }
}
