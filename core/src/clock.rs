//! Time source for cache freshness decisions.
//!
//! RULE: Nothing in the sync path calls `Utc::now()` directly.
//! All "now" values flow through a Clock so staleness is testable.

use crate::types::SyncInstant;
use chrono::{Duration, FixedOffset, NaiveDateTime, Utc};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> SyncInstant;

    /// "Now" as wall time in a zone `offset_minutes` east of UTC.
    fn local_now(&self, offset_minutes: i32) -> NaiveDateTime {
        let now = self.now();
        match FixedOffset::east_opt(offset_minutes * 60) {
            Some(offset) => now.with_timezone(&offset).naive_local(),
            None => now.naive_utc(),
        }
    }
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SyncInstant {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used by tests and replay tooling.
#[derive(Debug, Clone)]
pub struct FixedClock {
    current: Cell<SyncInstant>,
}

impl FixedClock {
    pub fn at(instant: SyncInstant) -> Self {
        Self {
            current: Cell::new(instant),
        }
    }

    pub fn set(&self, instant: SyncInstant) {
        self.current.set(instant);
    }

    /// Move forward by `seconds`. Returns the new instant.
    pub fn advance_secs(&self, seconds: i64) -> SyncInstant {
        let next = self.current.get() + Duration::seconds(seconds);
        self.current.set(next);
        next
    }
}

impl Clock for FixedClock {
    fn now(&self) -> SyncInstant {
        self.current.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> SyncInstant {
        (**self).now()
    }
}
