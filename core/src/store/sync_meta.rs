use super::ShiftStore;
use crate::{error::ShiftResult, keyed_store::SyncMarker, types::SyncInstant};
use rusqlite::{params, Connection, OptionalExtension};

pub(super) fn write_marker(conn: &Connection, at: SyncInstant) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO sync_meta (id, last_sync_at) VALUES (1, ?1)
         ON CONFLICT(id) DO UPDATE SET last_sync_at = excluded.last_sync_at",
        params![at],
    )?;
    Ok(())
}

impl SyncMarker for ShiftStore {
    fn record_sync_success(&self, at: SyncInstant) -> ShiftResult<()> {
        write_marker(&self.conn, at)?;
        Ok(())
    }

    fn last_sync_timestamp(&self) -> ShiftResult<Option<SyncInstant>> {
        let at = self
            .conn
            .query_row("SELECT last_sync_at FROM sync_meta WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(at)
    }
}
