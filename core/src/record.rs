//! Upstream record shapes: per-person assignments, people and workgroups.
//!
//! These are the already-deserialised rows of the scheduling backend's
//! response. Ingestion is tolerant: required string fields that are
//! missing or `null` deserialise as empty strings and are rejected later
//! by the validator instead of failing the whole batch.

use crate::types::{AssignmentId, PersonId, WorkgroupId};
use serde::{Deserialize, Deserializer, Serialize};

/// One person's assignment to one shift occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAssignment {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: AssignmentId,
    /// Shift title.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub workgroup_id: Option<WorkgroupId>,
    /// Shift-local wall time, compared verbatim for grouping.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start_timestamp: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub end_timestamp: String,
    /// `None` (or empty) marks an open, unfilled slot.
    #[serde(default)]
    pub assigned_person_id: Option<PersonId>,
    #[serde(default)]
    pub clocked_in: Option<bool>,
}

impl RawAssignment {
    /// Clock status is three-valued upstream (`true` / `false` / absent).
    /// Only an explicit `true` counts as clocked in; `false` and absent
    /// both collapse to `false`.
    pub fn is_clocked_in(&self) -> bool {
        self.clocked_in == Some(true)
    }

    /// The assigned person, treating an empty identifier as unassigned.
    pub fn assignee(&self) -> Option<&str> {
        self.assigned_person_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

/// Identity and display record for a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: PersonId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Organisational subgroup metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workgroup {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: WorkgroupId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<WorkgroupId>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_required_fields_become_empty() {
        let raw: RawAssignment = serde_json::from_str(
            r#"{"id": null, "name": "Gate A", "endTimestamp": "2024-05-01T16:00:00"}"#,
        )
        .unwrap();
        assert_eq!(raw.id, "");
        assert_eq!(raw.start_timestamp, "");
        assert_eq!(raw.end_timestamp, "2024-05-01T16:00:00");
        assert_eq!(raw.clocked_in, None);
    }

    #[test]
    fn clock_status_only_true_counts() {
        let mut raw = RawAssignment::default();
        assert!(!raw.is_clocked_in());
        raw.clocked_in = Some(false);
        assert!(!raw.is_clocked_in());
        raw.clocked_in = Some(true);
        assert!(raw.is_clocked_in());
    }

    #[test]
    fn empty_person_id_is_not_an_assignee() {
        let raw = RawAssignment {
            assigned_person_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(raw.assignee(), None);
    }
}
