use super::ShiftStore;
use crate::{
    error::{ShiftError, ShiftResult},
    keyed_store::KeyedStore,
    record::Person,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        display_name: row.get(1)?,
        given_name: row.get(2)?,
        family_name: row.get(3)?,
        phone: row.get(4)?,
    })
}

impl ShiftStore {
    // ── Person ────────────────────────────────────────────────────

    pub fn put_people(&self, people: &[Person]) -> ShiftResult<()> {
        KeyedStore::<Person>::put(self, people)
    }

    pub fn get_person(&self, id: &str) -> ShiftResult<Option<Person>> {
        KeyedStore::<Person>::get(self, id)
    }

    pub fn get_all_people(&self) -> ShiftResult<Vec<Person>> {
        KeyedStore::<Person>::get_all(self)
    }
}

pub(super) fn upsert_people(conn: &Connection, items: &[Person]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO person (person_id, display_name, given_name, family_name, phone)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(person_id) DO UPDATE SET
            display_name = excluded.display_name,
            given_name = excluded.given_name,
            family_name = excluded.family_name,
            phone = excluded.phone",
    )?;
    for p in items {
        stmt.execute(params![
            &p.id,
            &p.display_name,
            &p.given_name,
            &p.family_name,
            &p.phone
        ])?;
    }
    Ok(())
}

impl KeyedStore<Person> for ShiftStore {
    fn put(&self, items: &[Person]) -> ShiftResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        upsert_people(&tx, items)?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, id: &str) -> ShiftResult<Option<Person>> {
        let found = self
            .conn
            .query_row(
                "SELECT person_id, display_name, given_name, family_name, phone
                 FROM person WHERE person_id = ?1",
                params![id],
                person_from_row,
            )
            .optional()?;
        Ok(found)
    }

    fn get_all(&self) -> ShiftResult<Vec<Person>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT person_id, display_name, given_name, family_name, phone
             FROM person ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map([], person_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn get_by_index(&self, index: &str, _value: &str) -> ShiftResult<Vec<Person>> {
        Err(ShiftError::UnknownIndex {
            table: "person",
            index: index.to_string(),
        })
    }
}
