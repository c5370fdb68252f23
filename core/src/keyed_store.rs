//! Storage capabilities the sync policy depends on.
//!
//! RULE: The sync policy only sees these traits, never a concrete engine.
//! `ShiftStore` (SQLite) is the production implementation; tests may
//! substitute anything that implements them.

use crate::{
    error::ShiftResult,
    record::{Person, RawAssignment, Workgroup},
    types::SyncInstant,
};

/// Secondary index on `RawAssignment::workgroup_id`.
pub const WORKGROUP_INDEX: &str = "workgroup_id";

/// Primary-keyed collection with optional secondary indexes.
pub trait KeyedStore<T> {
    /// Upsert by primary key. Re-putting an id replaces its values.
    fn put(&self, items: &[T]) -> ShiftResult<()>;

    fn get(&self, id: &str) -> ShiftResult<Option<T>>;

    /// Every item, in first-insertion order.
    fn get_all(&self) -> ShiftResult<Vec<T>>;

    /// Items whose indexed column equals `value`, in first-insertion order.
    fn get_by_index(&self, index: &str, value: &str) -> ShiftResult<Vec<T>>;
}

/// Freshness marker for the whole cache.
pub trait SyncMarker {
    fn record_sync_success(&self, at: SyncInstant) -> ShiftResult<()>;
    fn last_sync_timestamp(&self) -> ShiftResult<Option<SyncInstant>>;
}

/// Everything the sync policy needs from a local cache.
pub trait LocalCache:
    KeyedStore<RawAssignment> + KeyedStore<Person> + KeyedStore<Workgroup> + SyncMarker
{
    /// Replace all cached assignments, people and workgroups with one
    /// complete upstream snapshot and advance the sync marker to
    /// `synced_at`. All or nothing: on error the previous contents and
    /// marker are left as they were.
    fn replace_snapshot(
        &self,
        records: &[RawAssignment],
        people: &[Person],
        workgroups: &[Workgroup],
        synced_at: SyncInstant,
    ) -> ShiftResult<()>;
}

/// `None` (or empty) returns every assignment; otherwise the workgroup
/// index is used instead of a scan.
pub fn assignments_by_workgroup<S>(store: &S, workgroup_id: Option<&str>) -> ShiftResult<Vec<RawAssignment>>
where
    S: KeyedStore<RawAssignment> + ?Sized,
{
    match workgroup_id.filter(|id| !id.is_empty()) {
        None => store.get_all(),
        Some(id) => store.get_by_index(WORKGROUP_INDEX, id),
    }
}
