//! SQLite persistence layer for the local shift cache.
//!
//! RULE: Only store/ talks to the database.
//! Everything else goes through the `KeyedStore` / `SyncMarker` traits
//! or the sync-log methods below, never raw SQL.

use crate::{
    error::ShiftResult,
    event::{SyncEvent, SyncLogEntry},
    types::SyncInstant,
};
mod assignment;
mod person;
mod snapshot;
mod sync_meta;
mod workgroup;
use rusqlite::{params, Connection};

pub struct ShiftStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl ShiftStore {
    pub fn open(path: &str) -> ShiftResult<Self> {
        if path == ":memory:" {
            return Self::in_memory();
        }
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> ShiftResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Open and migrate in one step.
    pub fn open_migrated(path: &str) -> ShiftResult<Self> {
        let store = Self::open(path)?;
        store.migrate()?;
        Ok(store)
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    pub fn reopen(&self) -> ShiftResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order. Safe to run repeatedly.
    pub fn migrate(&self) -> ShiftResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_shift_cache.sql"))?;
        Ok(())
    }

    // ── Sync log ───────────────────────────────────────────────

    pub fn append_sync_event(
        &self,
        sync_id: &str,
        occurred_at: SyncInstant,
        event: &SyncEvent,
    ) -> ShiftResult<()> {
        let payload = serde_json::to_string(event)?;
        self.conn.execute(
            "INSERT INTO sync_log (sync_id, occurred_at, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![sync_id, occurred_at, event.type_name(), payload],
        )?;
        Ok(())
    }

    /// Most recent entries first.
    pub fn recent_sync_events(&self, limit: usize) -> ShiftResult<Vec<SyncLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sync_id, occurred_at, event_type, payload
             FROM sync_log ORDER BY id DESC LIMIT ?1",
        )?;
        let entries = stmt
            .query_map(params![limit as i64], |row| {
                Ok(SyncLogEntry {
                    id: Some(row.get(0)?),
                    sync_id: row.get(1)?,
                    occurred_at: row.get(2)?,
                    event_type: row.get(3)?,
                    payload: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ── Test / summary helpers ────────────────────────────────────────

    /// Number of rows in a cache table (for tests and the runner summary).
    pub fn row_count(&self, table: CacheTable) -> ShiftResult<i64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.sql_name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Whether a query on the workgroup filter is served by the index.
    pub fn workgroup_lookup_uses_index(&self) -> ShiftResult<bool> {
        let mut stmt = self.conn.prepare(
            "EXPLAIN QUERY PLAN SELECT assignment_id FROM assignment WHERE workgroup_id = ?1",
        )?;
        let details = stmt
            .query_map(params!["any"], |row| row.get::<_, String>(3))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(details.iter().any(|d| d.contains("idx_assignment_workgroup")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTable {
    Assignment,
    Person,
    Workgroup,
    SyncLog,
}

impl CacheTable {
    fn sql_name(self) -> &'static str {
        match self {
            CacheTable::Assignment => "assignment",
            CacheTable::Person => "person",
            CacheTable::Workgroup => "workgroup",
            CacheTable::SyncLog => "sync_log",
        }
    }
}
