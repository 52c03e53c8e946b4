use thiserror::Error;

#[derive(Debug, Error)]
pub enum CycleError {
    /// Dataset missing, unreadable, or not a JSON array of `{ "term": ... }` objects.
    #[error("vocabulary unavailable at {path}: {reason}")]
    DataUnavailable { path: String, reason: String },

    #[error("no data found: vocabulary is empty")]
    NoData,

    /// Shuffle stack drained. Recovered by reinitializing; never surfaced.
    #[error("cycle exhausted")]
    CycleExhausted,

    #[error("remote store unavailable: {0}")]
    RemoteStoreUnavailable(String),

    #[error("remote store write failed: {0}")]
    RemoteStoreWriteFailure(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl CycleError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::DataUnavailable { .. } => 500,
            Self::NoData => 500,
            Self::CycleExhausted => 500,
            Self::RemoteStoreUnavailable(_) => 502,
            Self::RemoteStoreWriteFailure(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// True for failures the samplers absorb with a local fallback.
    pub fn is_absorbed(&self) -> bool {
        matches!(
            self,
            Self::CycleExhausted | Self::RemoteStoreUnavailable(_) | Self::RemoteStoreWriteFailure(_)
        )
    }
}
