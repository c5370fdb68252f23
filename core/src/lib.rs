//! shiftboard-core: reconstructs logical shifts from per-person assignment
//! records and keeps a local cache of them coherent with the upstream
//! scheduling backend.
//!
//! Aggregation side: `validator` -> `aggregator` (with `name_resolver`)
//! -> `metrics`. Cache side: `sync_policy` over a `keyed_store::LocalCache`
//! (SQLite `store::ShiftStore`) and a `remote::AssignmentSource`.

pub mod aggregator;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod keyed_store;
pub mod metrics;
pub mod name_generator;
pub mod name_resolver;
pub mod record;
pub mod remote;
pub mod rng;
pub mod roster;
pub mod shift_window;
pub mod store;
pub mod sync_policy;
pub mod types;
pub mod validator;
pub mod workgroup_filter;

pub use aggregator::{aggregate, Assignment, GroupingKey, ShiftGroup};
pub use error::{ShiftError, ShiftResult};
pub use record::{Person, RawAssignment, Workgroup};
