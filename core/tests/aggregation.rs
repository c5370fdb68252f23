//! Shift aggregation tests.
//!
//! Tests cover: grouping by the six-field key, person dedup, the
//! validation boundary, clock-status coercion and output ordering.

use shiftboard_core::{aggregate, metrics, Person, RawAssignment, ShiftGroup};
use std::collections::BTreeSet;

fn record(id: &str, person: Option<&str>, clocked_in: Option<bool>) -> RawAssignment {
    RawAssignment {
        id: id.into(),
        name: "Security - Gate".into(),
        subject: Some("Main event".into()),
        location: Some("Stadium".into()),
        workgroup_id: Some("wg-1".into()),
        start_timestamp: "2024-05-01T08:00:00".into(),
        end_timestamp: "2024-05-01T16:00:00".into(),
        assigned_person_id: person.map(Into::into),
        clocked_in,
    }
}

fn person(id: &str, given: &str, family: &str) -> Person {
    Person {
        id: id.into(),
        given_name: Some(given.into()),
        family_name: Some(family.into()),
        ..Default::default()
    }
}

fn assert_aligned(groups: &[ShiftGroup]) {
    for g in groups {
        let ids = g.assigned_person_ids();
        assert_eq!(ids.len(), g.assigned_person_names().len());
        assert_eq!(ids.len(), g.clock_statuses().len());
        let distinct: BTreeSet<_> = ids.iter().collect();
        assert_eq!(distinct.len(), ids.len(), "duplicate person in {ids:?}");
    }
}

/// Two records, same key, p1 clocked in and p2 not.
#[test]
fn same_key_collapses_into_one_shift() {
    let records = vec![
        record("a1", Some("p1"), Some(true)),
        record("a2", Some("p2"), Some(false)),
    ];
    let people = vec![person("p1", "Ada", "Lovelace"), person("p2", "Alan", "Turing")];

    let groups = aggregate(&records, &people);

    assert_eq!(groups.len(), 1);
    let g = &groups[0];
    assert_eq!(g.assigned_person_ids(), vec!["p1", "p2"]);
    assert_eq!(g.assigned_person_names(), vec!["Ada Lovelace", "Alan Turing"]);
    assert_eq!(g.clock_statuses(), vec![true, false]);
    assert_eq!(metrics::count_clocked_in(&groups), 1);
    assert_aligned(&groups);
}

#[test]
fn missing_clock_status_counts_as_not_clocked_in() {
    let groups = aggregate(&[record("a1", Some("p1"), None)], &[]);
    assert_eq!(groups[0].clock_statuses(), vec![false]);
}

#[test]
fn group_members_equal_distinct_assignees() {
    let records = vec![
        record("a1", Some("p3"), Some(true)),
        record("a2", None, None),
        record("a3", Some("p1"), Some(false)),
        record("a4", Some("p3"), Some(false)),
        record("a5", Some(""), Some(true)),
        record("a6", Some("p2"), Some(true)),
    ];

    let groups = aggregate(&records, &[]);

    assert_eq!(groups.len(), 1);
    let ids: BTreeSet<&str> = groups[0].assigned_person_ids().into_iter().collect();
    assert_eq!(ids, BTreeSet::from(["p1", "p2", "p3"]));
    assert_aligned(&groups);
}

#[test]
fn each_key_field_separates_groups() {
    let tweaks: [(&str, fn(&mut RawAssignment)); 6] = [
        ("name", |r| r.name.push_str(" (relief)")),
        ("start", |r| r.start_timestamp = "2024-05-01T09:00:00".into()),
        ("end", |r| r.end_timestamp = "2024-05-01T17:00:00".into()),
        ("workgroup", |r| r.workgroup_id = Some("wg-2".into())),
        ("subject", |r| r.subject = None),
        ("location", |r| r.location = Some("stadium".into())),
    ];

    for (field, tweak) in tweaks {
        let base = record("a1", Some("p1"), Some(true));
        let mut other = record("a2", Some("p2"), Some(true));
        tweak(&mut other);

        let groups = aggregate(&[base, other], &[]);
        assert_eq!(groups.len(), 2, "differing {field} must not group");
        assert_eq!(groups[0].assigned_person_ids(), vec!["p1"]);
        assert_eq!(groups[1].assigned_person_ids(), vec!["p2"]);
    }
}

#[test]
fn absent_and_empty_optional_fields_share_a_key() {
    let mut with_none = record("a1", Some("p1"), None);
    with_none.subject = None;
    let mut with_empty = record("a2", Some("p2"), None);
    with_empty.subject = Some(String::new());

    assert_eq!(aggregate(&[with_none, with_empty], &[]).len(), 1);
}

/// Duplicate rows for the same person keep the first clock status.
#[test]
fn duplicate_person_is_recorded_once_with_first_status() {
    let records = vec![
        record("a1", Some("p1"), Some(false)),
        record("a2", Some("p1"), Some(true)),
    ];

    let groups = aggregate(&records, &[]);

    assert_eq!(groups[0].assigned_person_ids(), vec!["p1"]);
    assert_eq!(groups[0].clock_statuses(), vec![false]);
}

#[test]
fn same_person_on_different_shifts_is_kept_in_both() {
    let mut late = record("a2", Some("p1"), Some(true));
    late.start_timestamp = "2024-05-01T16:00:00".into();
    late.end_timestamp = "2024-05-02T00:00:00".into();

    let groups = aggregate(&[record("a1", Some("p1"), Some(true)), late], &[]);

    assert_eq!(groups.len(), 2);
    assert_eq!(metrics::count_total_assigned(&groups), 2);
}

#[test]
fn invalid_records_are_excluded_without_disturbing_valid_ones() {
    let blanks: [fn(&mut RawAssignment); 4] = [
        |r| r.id.clear(),
        |r| r.name.clear(),
        |r| r.start_timestamp.clear(),
        |r| r.end_timestamp.clear(),
    ];
    for blank in blanks {
        let mut bad = record("bad", Some("intruder"), Some(true));
        blank(&mut bad);
        let records = vec![
            record("a1", Some("p1"), Some(true)),
            bad,
            record("a2", Some("p2"), Some(false)),
        ];

        let groups = aggregate(&records, &[]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].assigned_person_ids(), vec!["p1", "p2"]);
    }
}

#[test]
fn unfilled_shift_has_empty_assignments() {
    let groups = aggregate(&[record("a1", None, Some(true))], &[]);

    assert_eq!(groups.len(), 1);
    assert!(groups[0].is_unfilled());
    assert!(groups[0].assigned_person_ids().is_empty());
    assert!(groups[0].clock_statuses().is_empty());
}

#[test]
fn open_slot_first_then_assignee_fills_the_group() {
    let records = vec![record("a1", None, None), record("a2", Some("p1"), Some(true))];
    let groups = aggregate(&records, &[]);
    assert_eq!(groups[0].assigned_person_ids(), vec!["p1"]);
}

#[test]
fn unknown_people_resolve_to_unassigned() {
    let groups = aggregate(&[record("a1", Some("ghost"), None)], &[]);
    assert_eq!(groups[0].assigned_person_names(), vec!["Unassigned"]);
}

#[test]
fn empty_input_gives_empty_output() {
    let groups = aggregate(&[], &[]);
    assert!(groups.is_empty());
    assert_eq!(metrics::count_clocked_in(&groups), 0);
    assert_eq!(metrics::count_total_assigned(&groups), 0);
}

#[test]
fn groups_follow_first_seen_order_and_input_is_untouched() {
    let mut night = record("n1", Some("p9"), None);
    night.name = "Night Patrol".into();
    let mut night_2 = night.clone();
    night_2.id = "n2".into();
    night_2.assigned_person_id = Some("p8".into());

    let records = vec![night, record("a1", Some("p1"), None), night_2];
    let before = records.clone();
    let people = vec![person("p1", "Ada", "Lovelace")];
    let people_before = people.clone();

    let groups = aggregate(&records, &people);

    assert_eq!(records, before);
    assert_eq!(people, people_before);
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Night Patrol", "Security - Gate"]);
    assert_eq!(groups[0].assigned_person_ids(), vec!["p9", "p8"]);
}

#[test]
fn parallel_view_serializes_upstream_shape() {
    let groups = aggregate(
        &[record("a1", Some("p1"), Some(true)), record("a2", Some("p2"), None)],
        &[person("p1", "Ada", "Lovelace")],
    );

    let json = serde_json::to_value(groups[0].parallel_view()).unwrap();

    assert_eq!(json["assignedPersonIds"], serde_json::json!(["p1", "p2"]));
    assert_eq!(json["assignedPersonNames"], serde_json::json!(["Ada Lovelace", "Unassigned"]));
    assert_eq!(json["clockStatuses"], serde_json::json!([true, false]));
    assert_eq!(json["workgroupId"], "wg-1");
}

#[test]
fn grouping_key_displays_pipe_joined() {
    let groups = aggregate(&[record("a1", None, None)], &[]);
    assert_eq!(
        groups[0].key().to_string(),
        "Security - Gate|2024-05-01T08:00:00|2024-05-01T16:00:00|wg-1|Main event|Stadium"
    );
}
