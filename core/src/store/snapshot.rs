use super::{
    assignment::upsert_assignments, person::upsert_people, sync_meta::write_marker,
    workgroup::upsert_workgroups, ShiftStore,
};
use crate::{
    error::ShiftResult,
    keyed_store::LocalCache,
    record::{Person, RawAssignment, Workgroup},
    types::SyncInstant,
};

impl LocalCache for ShiftStore {
    /// Rows are rewritten in upstream order, so a cached read returns
    /// records in the same order the fetch that produced them did.
    fn replace_snapshot(
        &self,
        records: &[RawAssignment],
        people: &[Person],
        workgroups: &[Workgroup],
        synced_at: SyncInstant,
    ) -> ShiftResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(
            "DELETE FROM assignment;
             DELETE FROM person;
             DELETE FROM workgroup;",
        )?;
        upsert_assignments(&tx, records)?;
        upsert_people(&tx, people)?;
        upsert_workgroups(&tx, workgroups)?;
        write_marker(&tx, synced_at)?;
        tx.commit()?;
        Ok(())
    }
}
