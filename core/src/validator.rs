//! Record validation ahead of grouping.
//!
//! A record is usable only when its primary key, shift title and both
//! timestamps are present. Everything else is optional.

use crate::record::RawAssignment;

pub fn is_valid(record: &RawAssignment) -> bool {
    !record.id.is_empty()
        && !record.name.is_empty()
        && !record.start_timestamp.is_empty()
        && !record.end_timestamp.is_empty()
}

/// Name of the first missing required field, for debug logging.
pub fn first_missing_field(record: &RawAssignment) -> Option<&'static str> {
    if record.id.is_empty() {
        Some("id")
    } else if record.name.is_empty() {
        Some("name")
    } else if record.start_timestamp.is_empty() {
        Some("startTimestamp")
    } else if record.end_timestamp.is_empty() {
        Some("endTimestamp")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RawAssignment {
        RawAssignment {
            id: "a1".into(),
            name: "Front Desk".into(),
            start_timestamp: "2024-05-01T08:00:00".into(),
            end_timestamp: "2024-05-01T16:00:00".into(),
            ..Default::default()
        }
    }

    #[test]
    fn complete_record_is_valid() {
        assert!(is_valid(&complete()));
        assert_eq!(first_missing_field(&complete()), None);
    }

    #[test]
    fn each_required_field_is_checked() {
        let cases: [(fn(&mut RawAssignment), &str); 4] = [
            (|r| r.id.clear(), "id"),
            (|r| r.name.clear(), "name"),
            (|r| r.start_timestamp.clear(), "startTimestamp"),
            (|r| r.end_timestamp.clear(), "endTimestamp"),
        ];
        for (blank, field) in cases {
            let mut record = complete();
            blank(&mut record);
            assert!(!is_valid(&record), "blank {field} should be invalid");
            assert_eq!(first_missing_field(&record), Some(field));
        }
    }

    #[test]
    fn optional_fields_do_not_matter() {
        let record = RawAssignment {
            subject: None,
            location: None,
            workgroup_id: None,
            assigned_person_id: None,
            clocked_in: None,
            ..complete()
        };
        assert!(is_valid(&record));
    }
}
