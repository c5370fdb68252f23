use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShiftError {
    #[error("Local store unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote fetch from '{source_name}' failed: {reason}")]
    RemoteFetchFailed { source_name: String, reason: String },

    #[error("Invalid configuration for '{field}': {reason}")]
    Configuration { field: &'static str, reason: String },

    #[error("Table '{table}' has no index named '{index}'")]
    UnknownIndex { table: &'static str, index: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShiftError {
    /// True for failures of the local store itself. The sync policy treats
    /// these as "nothing cached" instead of surfacing them.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_) | Self::UnknownIndex { .. })
    }

    pub fn remote(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::RemoteFetchFailed {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type ShiftResult<T> = Result<T, ShiftError>;
