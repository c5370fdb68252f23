use super::ShiftStore;
use crate::{
    error::{ShiftError, ShiftResult},
    keyed_store::KeyedStore,
    record::Workgroup,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

fn workgroup_from_row(row: &Row<'_>) -> rusqlite::Result<Workgroup> {
    Ok(Workgroup {
        id: row.get(0)?,
        name: row.get(1)?,
        parent_id: row.get(2)?,
    })
}

impl ShiftStore {
    // ── Workgroup ─────────────────────────────────────────────────

    pub fn put_workgroups(&self, workgroups: &[Workgroup]) -> ShiftResult<()> {
        KeyedStore::<Workgroup>::put(self, workgroups)
    }

    pub fn get_workgroup(&self, id: &str) -> ShiftResult<Option<Workgroup>> {
        KeyedStore::<Workgroup>::get(self, id)
    }

    pub fn get_all_workgroups(&self) -> ShiftResult<Vec<Workgroup>> {
        KeyedStore::<Workgroup>::get_all(self)
    }
}

pub(super) fn upsert_workgroups(conn: &Connection, items: &[Workgroup]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO workgroup (workgroup_id, name, parent_id) VALUES (?1, ?2, ?3)
         ON CONFLICT(workgroup_id) DO UPDATE SET
            name = excluded.name,
            parent_id = excluded.parent_id",
    )?;
    for w in items {
        stmt.execute(params![&w.id, &w.name, &w.parent_id])?;
    }
    Ok(())
}

impl KeyedStore<Workgroup> for ShiftStore {
    fn put(&self, items: &[Workgroup]) -> ShiftResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        upsert_workgroups(&tx, items)?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, id: &str) -> ShiftResult<Option<Workgroup>> {
        let found = self
            .conn
            .query_row(
                "SELECT workgroup_id, name, parent_id FROM workgroup WHERE workgroup_id = ?1",
                params![id],
                workgroup_from_row,
            )
            .optional()?;
        Ok(found)
    }

    fn get_all(&self) -> ShiftResult<Vec<Workgroup>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT workgroup_id, name, parent_id FROM workgroup ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map([], workgroup_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn get_by_index(&self, index: &str, _value: &str) -> ShiftResult<Vec<Workgroup>> {
        Err(ShiftError::UnknownIndex {
            table: "workgroup",
            index: index.to_string(),
        })
    }
}
