//! Sync policy: decides between serving the local cache and fetching.
//!
//! STATES (evaluated per request):
//!   FORCED  caller asked to bypass the cache
//!   STALE   no successful sync recorded, or cache age >= threshold
//!   FRESH   otherwise
//!
//! RULES:
//!   - FRESH never contacts the remote source.
//!   - STALE and FORCED always try the remote source. On failure they
//!     serve whatever is cached (possibly nothing) and attach a warning.
//!   - A fetch always lists every workgroup, page by page, and the
//!     workgroup filter is applied locally. The single sync marker therefore
//!     always describes the whole cache.
//!   - A successful fetch replaces the cache contents and advances the
//!     marker in one transaction. Records upstream no longer sends are gone
//!     from the next cached read.
//!   - Storage failures count as "nothing cached". Nothing in here returns
//!     an error to the caller.

use crate::{
    aggregator::{self, ShiftGroup},
    clock::Clock,
    error::{ShiftError, ShiftResult},
    keyed_store::{assignments_by_workgroup, KeyedStore, LocalCache},
    metrics::{self, AggregationReport},
    record::{Person, RawAssignment, Workgroup},
    remote::{AssignmentSource, FetchResponse, PageRequest},
    types::SyncInstant,
    workgroup_filter::retain_workgroup,
};
use chrono::Duration;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncState {
    Fresh,
    Stale,
    Forced,
}

/// Pure transition rule; see the module docs.
pub fn evaluate(
    last_sync: Option<SyncInstant>,
    now: SyncInstant,
    threshold: Duration,
    force: bool,
) -> SyncState {
    if force {
        return SyncState::Forced;
    }
    match last_sync {
        None => SyncState::Stale,
        Some(at) if now - at >= threshold => SyncState::Stale,
        Some(_) => SyncState::Fresh,
    }
}

/// Non-fatal problems absorbed while answering a sync request.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum SyncWarning {
    #[error("remote fetch failed, serving cached data: {0}")]
    RemoteFetchFailed(String),
    #[error("local cache could not be read: {0}")]
    CacheReadFailed(String),
    #[error("local cache could not be written: {0}")]
    CacheWriteFailed(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub state: SyncState,
    pub assignments: Vec<RawAssignment>,
    pub people: Vec<Person>,
    pub workgroups: Vec<Workgroup>,
    /// True only when the data came from the remote source just now.
    pub is_fresh_data: bool,
    pub last_sync_timestamp: Option<SyncInstant>,
    pub warnings: Vec<SyncWarning>,
}

impl SyncOutcome {
    pub fn groups(&self) -> Vec<ShiftGroup> {
        aggregator::aggregate(&self.assignments, &self.people)
    }

    pub fn report(&self) -> AggregationReport {
        metrics::aggregate_report(&self.assignments, &self.people)
    }

    /// The remote failure, if the source was tried and failed.
    pub fn remote_error(&self) -> Option<&str> {
        self.warnings.iter().find_map(|w| match w {
            SyncWarning::RemoteFetchFailed(reason) => Some(reason.as_str()),
            _ => None,
        })
    }

    pub fn cache_write_failed(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, SyncWarning::CacheWriteFailed(_)))
    }
}

#[derive(Debug, Default)]
struct CachedData {
    assignments: Vec<RawAssignment>,
    people: Vec<Person>,
    workgroups: Vec<Workgroup>,
}

pub struct SyncPolicy<'a, S: ?Sized, R: ?Sized, C: ?Sized> {
    store: &'a S,
    source: &'a R,
    clock: &'a C,
    threshold: Duration,
    batch_size: Option<usize>,
}

impl<'a, S, R, C> SyncPolicy<'a, S, R, C>
where
    S: LocalCache + ?Sized,
    R: AssignmentSource + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(store: &'a S, source: &'a R, clock: &'a C, threshold: Duration) -> Self {
        Self {
            store,
            source,
            clock,
            threshold,
            batch_size: None,
        }
    }

    /// Page size for upstream listings. `None` fetches in one request.
    pub fn with_batch_size(mut self, batch_size: Option<usize>) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Current state without acting on it. An unreadable marker is
    /// treated as "never synced".
    pub fn state(&self, force: bool) -> SyncState {
        let last_sync = self.store.last_sync_timestamp().unwrap_or(None);
        evaluate(last_sync, self.clock.now(), self.threshold, force)
    }

    pub fn sync(&self, workgroup_id: Option<&str>, force: bool) -> SyncOutcome {
        let mut warnings = Vec::new();

        let last_sync = match self.store.last_sync_timestamp() {
            Ok(at) => at,
            Err(e) => {
                log::warn!("sync marker unreadable, treating cache as empty: {e}");
                warnings.push(SyncWarning::CacheReadFailed(e.to_string()));
                None
            }
        };

        let mut state = evaluate(last_sync, self.clock.now(), self.threshold, force);

        if state == SyncState::Fresh {
            match self.read_cache(workgroup_id) {
                Ok(cached) => {
                    log::debug!(
                        "cache fresh (last sync {last_sync:?}); serving {} assignments",
                        cached.assignments.len()
                    );
                    return SyncOutcome {
                        state,
                        assignments: cached.assignments,
                        people: cached.people,
                        workgroups: cached.workgroups,
                        is_fresh_data: false,
                        last_sync_timestamp: last_sync,
                        warnings,
                    };
                }
                Err(e) => {
                    log::warn!("cache read failed, fetching instead: {e}");
                    warnings.push(SyncWarning::CacheReadFailed(e.to_string()));
                    state = SyncState::Stale;
                }
            }
        }

        match self.fetch_all() {
            Ok(response) => self.accept(response, workgroup_id, state, last_sync, warnings),
            Err(e) => {
                log::warn!("fetch from '{}' failed: {e}", self.source.name());
                warnings.push(SyncWarning::RemoteFetchFailed(e.to_string()));
                self.fall_back(workgroup_id, state, last_sync, warnings)
            }
        }
    }

    fn accept(
        &self,
        response: FetchResponse,
        workgroup_id: Option<&str>,
        state: SyncState,
        previous_sync: Option<SyncInstant>,
        mut warnings: Vec<SyncWarning>,
    ) -> SyncOutcome {
        let synced_at = self.clock.now();
        let written = self.store.replace_snapshot(
            &response.records,
            &response.people,
            &response.workgroups,
            synced_at,
        );
        let last_sync_timestamp = match written {
            Ok(()) => {
                log::info!(
                    "synced {} assignments, {} people, {} workgroups from '{}'",
                    response.records.len(),
                    response.people.len(),
                    response.workgroups.len(),
                    self.source.name()
                );
                Some(synced_at)
            }
            Err(e) => {
                log::warn!("fetched data could not be cached; sync marker not advanced: {e}");
                warnings.push(SyncWarning::CacheWriteFailed(e.to_string()));
                previous_sync
            }
        };

        SyncOutcome {
            state,
            assignments: retain_workgroup(response.records, workgroup_id),
            people: response.people,
            workgroups: response.workgroups,
            is_fresh_data: true,
            last_sync_timestamp,
            warnings,
        }
    }

    fn fall_back(
        &self,
        workgroup_id: Option<&str>,
        state: SyncState,
        last_sync: Option<SyncInstant>,
        mut warnings: Vec<SyncWarning>,
    ) -> SyncOutcome {
        let cached = self.read_cache(workgroup_id).unwrap_or_else(|e| {
            log::warn!("no usable cache to fall back on: {e}");
            warnings.push(SyncWarning::CacheReadFailed(e.to_string()));
            CachedData::default()
        });
        SyncOutcome {
            state,
            assignments: cached.assignments,
            people: cached.people,
            workgroups: cached.workgroups,
            is_fresh_data: false,
            last_sync_timestamp: last_sync,
            warnings,
        }
    }

    /// Every page of the full upstream listing, stitched together.
    /// Duplicate ids across pages keep their first occurrence.
    fn fetch_all(&self) -> ShiftResult<FetchResponse> {
        let mut merged = FetchResponse::default();
        let mut seen_records = HashSet::new();
        let mut seen_people = HashSet::new();
        let mut seen_workgroups = HashSet::new();
        let mut page = PageRequest::first(self.batch_size);
        let mut pages = 0usize;

        loop {
            let chunk = self.source.fetch_assignments(None, page)?;
            pages += 1;
            let received = chunk.records.len();
            for record in chunk.records {
                if seen_records.insert(record.id.clone()) {
                    merged.records.push(record);
                }
            }
            for person in chunk.people {
                if seen_people.insert(person.id.clone()) {
                    merged.people.push(person);
                }
            }
            for workgroup in chunk.workgroups {
                if seen_workgroups.insert(workgroup.id.clone()) {
                    merged.workgroups.push(workgroup);
                }
            }

            if !chunk.has_more {
                break;
            }
            if received == 0 {
                return Err(ShiftError::remote(
                    self.source.name(),
                    format!("page at offset {} was empty but more were announced", page.offset),
                ));
            }
            page = page.after(received);
        }

        log::debug!(
            "fetched {} records in {pages} page(s) from '{}'",
            merged.records.len(),
            self.source.name()
        );
        Ok(merged)
    }

    fn read_cache(&self, workgroup_id: Option<&str>) -> ShiftResult<CachedData> {
        Ok(CachedData {
            assignments: assignments_by_workgroup(self.store, workgroup_id)?,
            people: <S as KeyedStore<Person>>::get_all(self.store)?,
            workgroups: <S as KeyedStore<Workgroup>>::get_all(self.store)?,
        })
    }
}
