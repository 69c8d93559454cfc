use thiserror::Error;

/// Failures of the host key-value storage or of the persisted payload.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("persisted records are not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Why a one-shot location request produced no fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("device does not support geolocation")]
    Unsupported,

    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("location request timed out after {0}ms")]
    Timeout(u64),
}

#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("summarization service is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("summarization service error: {0}")]
    Service(String),

    #[error("invalid response from summarization service: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("record {0} not found")]
    RecordNotFound(String),

    #[error("invalid time of day {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("could not parse time {0:?}, expected HH:mm")]
    UnparseableTime(String),

    #[error("{0} does not exist in the local timezone on that day")]
    NonexistentLocalTime(String),

    #[error("editing records requires the ADMIN role")]
    NotPermitted,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
