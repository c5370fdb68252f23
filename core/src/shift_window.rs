//! "Who is on shift right now": shift-local time parsing and windowing.
//!
//! Shift timestamps are wall times in the shift's own zone. RFC 3339
//! values are accepted, but only their local wall time is used.

use crate::{aggregator::ShiftGroup, record::RawAssignment};
use chrono::{DateTime, NaiveDateTime};

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn parse_shift_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_local());
    }
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// The shift's `[start, end)` window, if both ends parse.
pub fn shift_window(group: &ShiftGroup) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = parse_shift_time(&group.start_timestamp)?;
    let end = parse_shift_time(&group.end_timestamp)?;
    Some((start, end))
}

fn covers(start: &str, end: &str, at: NaiveDateTime) -> Option<bool> {
    let start = parse_shift_time(start)?;
    let end = parse_shift_time(end)?;
    Some(start <= at && at < end)
}

/// Shifts running at `at` (start inclusive, end exclusive), in input order.
pub fn on_shift_at(groups: &[ShiftGroup], at: NaiveDateTime) -> Vec<&ShiftGroup> {
    groups
        .iter()
        .filter(|group| match shift_window(group) {
            Some((start, end)) => start <= at && at < end,
            None => {
                log::debug!("unparsable window for shift {}", group.key());
                false
            }
        })
        .collect()
}

/// Records whose shift is running at `at`, in input order. Grouping
/// these gives the same shifts as `on_shift_at` over the full grouping,
/// since every record of a shift carries the shift's timestamps.
pub fn records_on_shift_at(records: &[RawAssignment], at: NaiveDateTime) -> Vec<&RawAssignment> {
    records
        .iter()
        .filter(|record| {
            covers(&record.start_timestamp, &record.end_timestamp, at).unwrap_or(false)
        })
        .collect()
}
