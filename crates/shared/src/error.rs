//! Shared error types.

use thiserror::Error;

/// Why an inbound frame could not be turned into an event.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("frame has no type tag")]
    MissingTag,
    #[error("unknown frame type '{0}'")]
    UnknownTag(String),
}

/// API error type for client-side use of the lobby endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    /// The endpoint answered `{success: false}`.
    #[error("Rejected: {0}")]
    Rejected(String),
}
