use thiserror::Error;

/// Failures of the key-value store behind the history.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is not available: {0}")]
    Unavailable(String),

    #[error("storage operation on '{key}' failed: {reason}")]
    Backend { key: String, reason: String },

    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures talking to the remote chat endpoint.
///
/// An `error` field inside a well-formed response is not an `ApiError`; it is
/// a regular [`crate::ChatResponse`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse widget config: {0}")]
    Parse(String),

    #[error("invalid widget config: {0}")]
    Invalid(String),
}
