//! Sink error types

use thiserror::Error;

/// Failures while publishing to a telemetry sink
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SinkError {
    /// Endpoint URL could not be built
    #[error("invalid sink url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// Network or client failure before a response arrived
    #[error("transport error: {details}")]
    Transport { details: String },
    /// Remote store answered with a non-success status
    #[error("request rejected with status {status}")]
    Rejected { status: u16 },
    /// Record could not be encoded
    #[error("serialization error: {details}")]
    Serialization { details: String },
    /// Sink is offline
    #[error("sink '{sink}' is disconnected")]
    Disconnected { sink: String },
}

impl From<reqwest::Error> for SinkError {
    fn from(error: reqwest::Error) -> Self {
        SinkError::Transport {
            details: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(error: serde_json::Error) -> Self {
        SinkError::Serialization {
            details: error.to_string(),
        }
    }
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;
