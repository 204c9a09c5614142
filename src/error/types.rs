//! Error types.

use thiserror::Error;

/// Errors surfaced by the normalization layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// The transport failed to deliver bytes or a response body.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The SSE framing itself was broken (not a payload problem).
    #[error("Stream error: {0}")]
    StreamError(String),

    /// A payload could not be decoded into the expected wire shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// A caller-supplied value is not acceptable.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The consumer cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,
}

impl LlmError {
    /// Whether the error originated below the normalization layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::HttpError(_) | Self::StreamError(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LlmError>;
