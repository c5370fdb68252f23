//! Shift aggregation: collapses per-person assignment records into shifts.
//!
//! Upstream sends one record per assigned person, so a five-person shift
//! arrives as five records that differ only in the assignee. Records with
//! equal (name, start, end, workgroup, subject, location) belong to the
//! same shift. Matching is exact; nothing is trimmed or normalised.
//!
//! RULES:
//!   - One pass over the records, O(1) map work per record.
//!   - Output order is the order in which each shift key was first seen.
//!   - A person appears at most once per shift; the first record wins,
//!     later duplicates (including their clock status) are ignored.
//!   - Invalid records are skipped and never affect other groups.

use crate::{
    name_resolver::PeopleIndex,
    record::{Person, RawAssignment},
    types::{PersonId, WorkgroupId},
    validator,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The six-field identity of a shift, borrowed from a record.
/// Absent optional fields compare equal to empty ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupingKey<'a> {
    pub name: &'a str,
    pub start_timestamp: &'a str,
    pub end_timestamp: &'a str,
    pub workgroup_id: &'a str,
    pub subject: &'a str,
    pub location: &'a str,
}

impl<'a> GroupingKey<'a> {
    pub fn of(record: &'a RawAssignment) -> Self {
        Self {
            name: &record.name,
            start_timestamp: &record.start_timestamp,
            end_timestamp: &record.end_timestamp,
            workgroup_id: record.workgroup_id.as_deref().unwrap_or(""),
            subject: record.subject.as_deref().unwrap_or(""),
            location: record.location.as_deref().unwrap_or(""),
        }
    }
}

impl fmt::Display for GroupingKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}",
            self.name,
            self.start_timestamp,
            self.end_timestamp,
            self.workgroup_id,
            self.subject,
            self.location
        )
    }
}

/// One person on a shift. Replaces the upstream parallel arrays, so id,
/// name and clock status can never drift out of alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub person_id: PersonId,
    pub name: String,
    pub clocked_in: bool,
}

/// A logical shift with everyone assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftGroup {
    pub name: String,
    pub start_timestamp: String,
    pub end_timestamp: String,
    pub workgroup_id: Option<WorkgroupId>,
    pub subject: Option<String>,
    pub location: Option<String>,
    assignments: Vec<Assignment>,
}

impl ShiftGroup {
    fn from_record(record: &RawAssignment) -> Self {
        Self {
            name: record.name.clone(),
            start_timestamp: record.start_timestamp.clone(),
            end_timestamp: record.end_timestamp.clone(),
            workgroup_id: record.workgroup_id.clone(),
            subject: record.subject.clone(),
            location: record.location.clone(),
            assignments: Vec::new(),
        }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn key(&self) -> GroupingKey<'_> {
        GroupingKey {
            name: &self.name,
            start_timestamp: &self.start_timestamp,
            end_timestamp: &self.end_timestamp,
            workgroup_id: self.workgroup_id.as_deref().unwrap_or(""),
            subject: self.subject.as_deref().unwrap_or(""),
            location: self.location.as_deref().unwrap_or(""),
        }
    }

    /// A shift nobody has been assigned to yet.
    pub fn is_unfilled(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn clocked_in_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.clocked_in).count()
    }

    pub fn assigned_person_ids(&self) -> Vec<&str> {
        self.assignments.iter().map(|a| a.person_id.as_str()).collect()
    }

    pub fn assigned_person_names(&self) -> Vec<&str> {
        self.assignments.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn clock_statuses(&self) -> Vec<bool> {
        self.assignments.iter().map(|a| a.clocked_in).collect()
    }

    /// Flattened parallel-array shape for consumers that expect it.
    pub fn parallel_view(&self) -> ShiftGroupView<'_> {
        ShiftGroupView {
            name: &self.name,
            start_timestamp: &self.start_timestamp,
            end_timestamp: &self.end_timestamp,
            workgroup_id: self.workgroup_id.as_deref(),
            subject: self.subject.as_deref(),
            location: self.location.as_deref(),
            assigned_person_ids: self.assigned_person_ids(),
            assigned_person_names: self.assigned_person_names(),
            clock_statuses: self.clock_statuses(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftGroupView<'a> {
    pub name: &'a str,
    pub start_timestamp: &'a str,
    pub end_timestamp: &'a str,
    pub workgroup_id: Option<&'a str>,
    pub subject: Option<&'a str>,
    pub location: Option<&'a str>,
    pub assigned_person_ids: Vec<&'a str>,
    pub assigned_person_names: Vec<&'a str>,
    pub clock_statuses: Vec<bool>,
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct AggregationPass {
    pub groups: Vec<ShiftGroup>,
    pub skipped_invalid: usize,
}

/// Group records into shifts. See the module docs for the rules.
pub fn aggregate(records: &[RawAssignment], people: &[Person]) -> Vec<ShiftGroup> {
    aggregate_pass(records, people).groups
}

pub fn aggregate_pass(records: &[RawAssignment], people: &[Person]) -> AggregationPass {
    let index = PeopleIndex::build(people);

    let mut groups: Vec<ShiftGroup> = Vec::new();
    let mut slot_by_key: HashMap<GroupingKey<'_>, usize> = HashMap::with_capacity(records.len());
    let mut seated: HashSet<(usize, &str)> = HashSet::with_capacity(records.len());
    let mut skipped_invalid = 0usize;

    for record in records {
        if let Some(field) = validator::first_missing_field(record) {
            skipped_invalid += 1;
            log::debug!("skipping assignment id={:?}: missing {field}", record.id);
            continue;
        }

        let key = GroupingKey::of(record);
        let slot = *slot_by_key.entry(key).or_insert_with(|| {
            groups.push(ShiftGroup::from_record(record));
            groups.len() - 1
        });

        let Some(person_id) = record.assignee() else {
            continue;
        };
        if !seated.insert((slot, person_id)) {
            log::debug!("duplicate assignment of {person_id} to shift {key}; keeping first");
            continue;
        }
        groups[slot].assignments.push(Assignment {
            person_id: person_id.to_string(),
            name: index.resolve(person_id),
            clocked_in: record.is_clocked_in(),
        });
    }

    AggregationPass {
        groups,
        skipped_invalid,
    }
}
