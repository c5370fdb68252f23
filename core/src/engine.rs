//! The shift engine. Owns the local cache and answers dashboard queries.
//!
//! FLOW per request:
//!   1. SyncPolicy decides between the cache and the remote source.
//!   2. The returned records are aggregated into shifts.
//!   3. The attempt is appended to the sync log.
//!
//! The engine holds explicitly constructed collaborators (store, source,
//! clock). There is no global client.

use crate::{
    aggregator::ShiftGroup,
    clock::{Clock, SystemClock},
    config::ShiftConfig,
    error::ShiftResult,
    event::{SyncEvent, SyncLogEntry},
    metrics::{self, AggregateMetrics, AggregationReport},
    record::RawAssignment,
    remote::AssignmentSource,
    shift_window,
    store::ShiftStore,
    sync_policy::{SyncOutcome, SyncPolicy, SyncState, SyncWarning},
    types::SyncInstant,
};
use serde::Serialize;

/// Dashboard-ready answer: shifts plus freshness metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftBoard {
    pub state: SyncState,
    pub groups: Vec<ShiftGroup>,
    pub metrics: AggregateMetrics,
    pub is_fresh_data: bool,
    pub last_sync_timestamp: Option<SyncInstant>,
    pub warnings: Vec<SyncWarning>,
}

impl ShiftBoard {
    fn from_report(outcome: SyncOutcome, report: AggregationReport) -> Self {
        Self {
            state: outcome.state,
            groups: report.groups,
            metrics: report.metrics,
            is_fresh_data: outcome.is_fresh_data,
            last_sync_timestamp: outcome.last_sync_timestamp,
            warnings: outcome.warnings,
        }
    }
}

pub struct ShiftEngine<R, C = SystemClock> {
    pub config: ShiftConfig,
    store: ShiftStore,
    source: R,
    clock: C,
}

impl<R: AssignmentSource> ShiftEngine<R, SystemClock> {
    /// Build against the real clock, opening and migrating `config.db_path`.
    pub fn build(config: ShiftConfig, source: R) -> ShiftResult<Self> {
        Self::build_with_clock(config, source, SystemClock)
    }
}

impl<R: AssignmentSource, C: Clock> ShiftEngine<R, C> {
    pub fn new(config: ShiftConfig, store: ShiftStore, source: R, clock: C) -> Self {
        Self {
            config,
            store,
            source,
            clock,
        }
    }

    pub fn build_with_clock(config: ShiftConfig, source: R, clock: C) -> ShiftResult<Self> {
        config.validate()?;
        let store = ShiftStore::open_migrated(&config.db_path)?;
        Ok(Self::new(config, store, source, clock))
    }

    /// In-memory store and test config.
    pub fn build_test(source: R, clock: C) -> ShiftResult<Self> {
        Self::build_with_clock(ShiftConfig::default_test(), source, clock)
    }

    pub fn store(&self) -> &ShiftStore {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn policy(&self) -> SyncPolicy<'_, ShiftStore, R, C> {
        SyncPolicy::new(
            &self.store,
            &self.source,
            &self.clock,
            self.config.freshness_threshold(),
        )
        .with_batch_size(self.config.batch_size)
    }

    /// Raw records for a workgroup (or all), cached or fresh per policy.
    pub fn sync(&self, workgroup_id: Option<&str>, force: bool) -> SyncOutcome {
        let outcome = self.policy().sync(workgroup_id, force);
        self.log_sync(workgroup_id, force, &outcome);
        outcome
    }

    /// Aggregated shifts for a workgroup (or all).
    pub fn board(&self, workgroup_id: Option<&str>, force: bool) -> ShiftBoard {
        let outcome = self.sync(workgroup_id, force);
        let report = outcome.report();
        ShiftBoard::from_report(outcome, report)
    }

    /// Like `board`, narrowed to shifts running at the current shift-local
    /// time. Records are windowed before aggregation, so every metric
    /// (including the record and skipped counts) covers the same scope.
    pub fn on_shift_now(&self, workgroup_id: Option<&str>, force: bool) -> ShiftBoard {
        let outcome = self.sync(workgroup_id, force);
        let now = self.clock.local_now(self.config.shift_utc_offset_minutes);

        let active: Vec<RawAssignment> = shift_window::records_on_shift_at(&outcome.assignments, now)
            .into_iter()
            .cloned()
            .collect();
        let report = metrics::aggregate_report(&active, &outcome.people);
        log::debug!(
            "{} shifts on at {now} ({} people, {} clocked in)",
            report.metrics.total_after_grouping,
            report.metrics.total_assigned,
            report.metrics.clocked_in_count
        );
        ShiftBoard::from_report(outcome, report)
    }

    pub fn recent_sync_log(&self, limit: usize) -> ShiftResult<Vec<SyncLogEntry>> {
        self.store.recent_sync_events(limit)
    }

    fn log_sync(&self, workgroup_id: Option<&str>, force: bool, outcome: &SyncOutcome) {
        let workgroup_id = workgroup_id.map(str::to_string);
        let event = if outcome.is_fresh_data {
            SyncEvent::FetchSucceeded {
                workgroup_id,
                forced: force,
                records: outcome.assignments.len(),
                people: outcome.people.len(),
                workgroups: outcome.workgroups.len(),
                cache_written: !outcome.cache_write_failed(),
            }
        } else if let Some(reason) = outcome.remote_error() {
            SyncEvent::FetchFailed {
                workgroup_id,
                forced: force,
                reason: reason.to_string(),
                fallback_assignments: outcome.assignments.len(),
            }
        } else {
            SyncEvent::CacheServed {
                workgroup_id,
                assignments: outcome.assignments.len(),
            }
        };

        let sync_id = uuid::Uuid::new_v4().to_string();
        if let Err(e) = self.store.append_sync_event(&sync_id, self.clock.now(), &event) {
            log::warn!("sync {sync_id} ({}) not logged: {e}", event.type_name());
        }
    }
}
