//! Shared primitive types used across the aggregation and cache layers.

/// Upstream primary key of a single per-person assignment record.
pub type AssignmentId = String;

/// Upstream identifier of a person (employee).
pub type PersonId = String;

/// Upstream identifier of an organisational subgroup.
pub type WorkgroupId = String;

/// Wall-clock instant used for cache freshness. Always UTC.
pub type SyncInstant = chrono::DateTime<chrono::Utc>;
