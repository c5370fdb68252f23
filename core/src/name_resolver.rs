//! Person id -> display name resolution.

use crate::record::Person;
use std::collections::HashMap;

pub const UNASSIGNED: &str = "Unassigned";

/// Read-only id -> person lookup, built once per aggregation pass.
pub struct PeopleIndex<'a> {
    by_id: HashMap<&'a str, &'a Person>,
}

impl<'a> PeopleIndex<'a> {
    pub fn build(people: &'a [Person]) -> Self {
        let by_id = people.iter().map(|p| (p.id.as_str(), p)).collect();
        Self { by_id }
    }

    pub fn get(&self, person_id: &str) -> Option<&'a Person> {
        self.by_id.get(person_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Resolve a display name. First match wins:
    /// display name, "given family", whichever single part exists,
    /// otherwise `"Unassigned"` (also for empty or unknown ids).
    pub fn resolve(&self, person_id: &str) -> String {
        if person_id.is_empty() {
            return UNASSIGNED.to_string();
        }
        match self.get(person_id) {
            Some(person) => display_name(person),
            None => UNASSIGNED.to_string(),
        }
    }
}

fn display_name(person: &Person) -> String {
    let display = non_blank(person.display_name.as_deref());
    let given = non_blank(person.given_name.as_deref());
    let family = non_blank(person.family_name.as_deref());

    match (display, given, family) {
        (Some(display), _, _) => display.to_string(),
        (None, Some(given), Some(family)) => format!("{given} {family}"),
        (None, Some(only), None) | (None, None, Some(only)) => only.to_string(),
        (None, None, None) => UNASSIGNED.to_string(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
