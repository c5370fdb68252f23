//! Summary counts derived from aggregated shifts.

use crate::{
    aggregator::{self, ShiftGroup},
    record::{Person, RawAssignment},
};
use serde::Serialize;

pub fn count_clocked_in(groups: &[ShiftGroup]) -> usize {
    groups.iter().map(ShiftGroup::clocked_in_count).sum()
}

pub fn count_total_assigned(groups: &[ShiftGroup]) -> usize {
    groups.iter().map(ShiftGroup::assigned_count).sum()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    /// Records received, valid or not.
    pub total_before_grouping: usize,
    /// Shifts produced.
    pub total_after_grouping: usize,
    pub clocked_in_count: usize,
    pub total_assigned: usize,
    pub skipped_invalid: usize,
}

impl AggregateMetrics {
    pub fn from_groups(records_in: usize, groups: &[ShiftGroup], skipped_invalid: usize) -> Self {
        Self {
            total_before_grouping: records_in,
            total_after_grouping: groups.len(),
            clocked_in_count: count_clocked_in(groups),
            total_assigned: count_total_assigned(groups),
            skipped_invalid,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregationReport {
    pub groups: Vec<ShiftGroup>,
    pub metrics: AggregateMetrics,
}

/// Aggregation entry point: grouped shifts plus their summary counts.
pub fn aggregate_report(records: &[RawAssignment], people: &[Person]) -> AggregationReport {
    let pass = aggregator::aggregate_pass(records, people);
    let metrics = AggregateMetrics::from_groups(records.len(), &pass.groups, pass.skipped_invalid);
    log::debug!(
        "aggregated {} records into {} shifts ({} clocked in, {} skipped)",
        metrics.total_before_grouping,
        metrics.total_after_grouping,
        metrics.clocked_in_count,
        metrics.skipped_invalid
    );
    AggregationReport {
        groups: pass.groups,
        metrics,
    }
}
