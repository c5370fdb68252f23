//! The upstream scheduling backend, seen only through `AssignmentSource`.
//!
//! The HTTP client, authentication and retry/backoff all live behind this
//! trait. The sync policy receives a source explicitly; there is no global
//! client.

use crate::{
    error::{ShiftError, ShiftResult},
    record::{Person, RawAssignment, Workgroup},
    workgroup_filter::retain_workgroup,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One upstream response: records plus the reference data to resolve them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchResponse {
    pub records: Vec<RawAssignment>,
    pub people: Vec<Person>,
    pub workgroups: Vec<Workgroup>,
    /// More records exist past this page.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub has_more: bool,
}

/// Which slice of the record listing to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    /// `None` asks for everything from `offset` on.
    pub limit: Option<usize>,
}

impl PageRequest {
    pub fn first(limit: Option<usize>) -> Self {
        Self { offset: 0, limit }
    }

    /// The page after one that returned `received` records.
    pub fn after(self, received: usize) -> Self {
        Self {
            offset: self.offset.saturating_add(received),
            limit: self.limit,
        }
    }
}

/// Cut one page out of a complete listing.
fn page_of(mut response: FetchResponse, workgroup_id: Option<&str>, page: PageRequest) -> FetchResponse {
    let records = retain_workgroup(std::mem::take(&mut response.records), workgroup_id);
    let total = records.len();
    let start = page.offset.min(total);
    let end = page
        .limit
        .map_or(total, |limit| start.saturating_add(limit).min(total));
    response.records = records.into_iter().skip(start).take(end - start).collect();
    response.has_more = end < total;
    response
}

pub trait AssignmentSource {
    /// Name used in logs and `RemoteFetchFailed` errors.
    fn name(&self) -> &str;

    /// Fetch one page of assignments, optionally for one workgroup.
    /// `has_more` is set when records remain past the page.
    /// Failures are `ShiftError::RemoteFetchFailed`.
    fn fetch_assignments(
        &self,
        workgroup_id: Option<&str>,
        page: PageRequest,
    ) -> ShiftResult<FetchResponse>;
}

impl<S: AssignmentSource + ?Sized> AssignmentSource for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_assignments(
        &self,
        workgroup_id: Option<&str>,
        page: PageRequest,
    ) -> ShiftResult<FetchResponse> {
        (**self).fetch_assignments(workgroup_id, page)
    }
}

impl<S: AssignmentSource + ?Sized> AssignmentSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_assignments(
        &self,
        workgroup_id: Option<&str>,
        page: PageRequest,
    ) -> ShiftResult<FetchResponse> {
        (**self).fetch_assignments(workgroup_id, page)
    }
}

/// Serves a saved upstream response from disk. The file is re-read on
/// every fetch, so editing it between syncs behaves like upstream changes.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AssignmentSource for JsonFileSource {
    fn name(&self) -> &str {
        "json-file"
    }

    fn fetch_assignments(
        &self,
        workgroup_id: Option<&str>,
        page: PageRequest,
    ) -> ShiftResult<FetchResponse> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ShiftError::remote(self.name(), format!("cannot read {}: {e}", self.path.display()))
        })?;
        let response: FetchResponse = serde_json::from_str(&content).map_err(|e| {
            ShiftError::remote(self.name(), format!("cannot parse {}: {e}", self.path.display()))
        })?;
        Ok(page_of(response, workgroup_id, page))
    }
}

/// Always succeeds with the same response. Used by tests and the
/// synthetic-roster mode of the runner.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    response: FetchResponse,
}

impl StaticSource {
    pub fn new(response: FetchResponse) -> Self {
        Self { response }
    }
}

impl AssignmentSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_assignments(
        &self,
        workgroup_id: Option<&str>,
        page: PageRequest,
    ) -> ShiftResult<FetchResponse> {
        Ok(page_of(self.response.clone(), workgroup_id, page))
    }
}
