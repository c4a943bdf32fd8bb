//! Protocol error types

use thiserror::Error;

/// Errors raised while decoding or building frame documents
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The client-echoed state could not be decoded
    #[error("Malformed frame state: {0}")]
    MalformedState(#[from] serde_json::Error),

    /// A configured URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A configured URL cannot serve as a base
    #[error("URL cannot be used as a base: {0}")]
    NotABase(String),
}

/// Result type for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;
