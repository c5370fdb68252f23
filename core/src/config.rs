use crate::error::{ShiftError, ShiftResult};
use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FRESHNESS_THRESHOLD_SECS: u64 = 60;

/// Largest offset any real zone uses, in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShiftConfig {
    /// Cache age at which a read is considered stale.
    pub freshness_threshold_secs: u64,
    /// Records per upstream page. A sync always fetches every page;
    /// `None` lists everything in one request.
    pub batch_size: Option<usize>,
    /// SQLite path for the local cache; `:memory:` keeps it in-process.
    pub db_path: String,
    /// Offset of shift-local time from UTC, used for "on shift now".
    pub shift_utc_offset_minutes: i32,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            freshness_threshold_secs: DEFAULT_FRESHNESS_THRESHOLD_SECS,
            batch_size: None,
            db_path: ":memory:".into(),
            shift_utc_offset_minutes: 0,
        }
    }
}

impl ShiftConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    /// In tests, use ShiftConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ShiftConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in tests.
    pub fn default_test() -> Self {
        Self {
            freshness_threshold_secs: 60,
            batch_size: Some(500),
            db_path: ":memory:".into(),
            shift_utc_offset_minutes: 0,
        }
    }

    pub fn validate(&self) -> ShiftResult<()> {
        if self.freshness_threshold_secs == 0 {
            return Err(ShiftError::Configuration {
                field: "freshness_threshold_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if threshold_duration(self.freshness_threshold_secs).is_none() {
            return Err(ShiftError::Configuration {
                field: "freshness_threshold_secs",
                reason: format!("{} is out of range", self.freshness_threshold_secs),
            });
        }
        if self.batch_size == Some(0) {
            return Err(ShiftError::Configuration {
                field: "batch_size",
                reason: "must be greater than zero when set".into(),
            });
        }
        if self.shift_utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ShiftError::Configuration {
                field: "shift_utc_offset_minutes",
                reason: format!("{} is outside ±18h", self.shift_utc_offset_minutes),
            });
        }
        if self.db_path.trim().is_empty() {
            return Err(ShiftError::Configuration {
                field: "db_path",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn freshness_threshold(&self) -> Duration {
        threshold_duration(self.freshness_threshold_secs).unwrap_or(Duration::MAX)
    }
}

fn threshold_duration(secs: u64) -> Option<Duration> {
    i64::try_from(secs).ok().and_then(Duration::try_seconds)
}
