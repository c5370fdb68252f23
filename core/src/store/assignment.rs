use super::ShiftStore;
use crate::{
    error::{ShiftError, ShiftResult},
    keyed_store::{assignments_by_workgroup, KeyedStore, WORKGROUP_INDEX},
    record::RawAssignment,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_ASSIGNMENT: &str = "SELECT assignment_id, name, subject, location, workgroup_id,
        start_timestamp, end_timestamp, assigned_person_id, clocked_in
     FROM assignment";

fn assignment_from_row(row: &Row<'_>) -> rusqlite::Result<RawAssignment> {
    Ok(RawAssignment {
        id: row.get(0)?,
        name: row.get(1)?,
        subject: row.get(2)?,
        location: row.get(3)?,
        workgroup_id: row.get(4)?,
        start_timestamp: row.get(5)?,
        end_timestamp: row.get(6)?,
        assigned_person_id: row.get(7)?,
        clocked_in: row.get(8)?,
    })
}

impl ShiftStore {
    // ── Assignment ────────────────────────────────────────────────

    pub fn put_assignments(&self, records: &[RawAssignment]) -> ShiftResult<()> {
        KeyedStore::<RawAssignment>::put(self, records)
    }

    pub fn get_assignment(&self, id: &str) -> ShiftResult<Option<RawAssignment>> {
        KeyedStore::<RawAssignment>::get(self, id)
    }

    /// `None` returns every stored assignment.
    pub fn get_assignments_by_workgroup(
        &self,
        workgroup_id: Option<&str>,
    ) -> ShiftResult<Vec<RawAssignment>> {
        assignments_by_workgroup(self, workgroup_id)
    }
}

/// Upsert inside the caller's transaction.
pub(super) fn upsert_assignments(conn: &Connection, items: &[RawAssignment]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO assignment (
            assignment_id, name, subject, location, workgroup_id,
            start_timestamp, end_timestamp, assigned_person_id, clocked_in
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(assignment_id) DO UPDATE SET
            name = excluded.name,
            subject = excluded.subject,
            location = excluded.location,
            workgroup_id = excluded.workgroup_id,
            start_timestamp = excluded.start_timestamp,
            end_timestamp = excluded.end_timestamp,
            assigned_person_id = excluded.assigned_person_id,
            clocked_in = excluded.clocked_in",
    )?;
    for a in items {
        stmt.execute(params![
            &a.id,
            &a.name,
            &a.subject,
            &a.location,
            &a.workgroup_id,
            &a.start_timestamp,
            &a.end_timestamp,
            &a.assigned_person_id,
            a.clocked_in,
        ])?;
    }
    Ok(())
}

impl KeyedStore<RawAssignment> for ShiftStore {
    fn put(&self, items: &[RawAssignment]) -> ShiftResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        upsert_assignments(&tx, items)?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, id: &str) -> ShiftResult<Option<RawAssignment>> {
        let found = self
            .conn
            .query_row(
                &format!("{SELECT_ASSIGNMENT} WHERE assignment_id = ?1"),
                params![id],
                assignment_from_row,
            )
            .optional()?;
        Ok(found)
    }

    fn get_all(&self) -> ShiftResult<Vec<RawAssignment>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{SELECT_ASSIGNMENT} ORDER BY rowid ASC"))?;
        let rows = stmt.query_map([], assignment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn get_by_index(&self, index: &str, value: &str) -> ShiftResult<Vec<RawAssignment>> {
        if index != WORKGROUP_INDEX {
            return Err(ShiftError::UnknownIndex {
                table: "assignment",
                index: index.to_string(),
            });
        }
        let mut stmt = self.conn.prepare_cached(&format!(
            "{SELECT_ASSIGNMENT} WHERE workgroup_id = ?1 ORDER BY rowid ASC"
        ))?;
        let rows = stmt.query_map(params![value], assignment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
