//! Server error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use frame_protocol::{responses::ErrorResponse, ProtocolError};

/// Body returned for every failure that is not the caller's fault.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The frame message failed signature verification.
    #[error("Invalid frame message")]
    InvalidSignature,

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The echoed frame state could not be decoded.
    #[error("Malformed frame state: {0}")]
    MalformedState(String),

    /// Authentication required.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] todo_store::TodoStoreError),

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] auth::AuthError),

    /// The verification hub could not be reached or answered garbage.
    #[error("Verifier error: {0}")]
    Verifier(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ProtocolError> for ServerError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::MalformedState(e) => ServerError::MalformedState(e.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidSignature
            | ServerError::InvalidRequest(_)
            | ServerError::MalformedState(_) => StatusCode::BAD_REQUEST,
            ServerError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Database(todo_store::TodoStoreError::NotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            ServerError::Auth(auth::AuthError::JwtEncoding(_))
            | ServerError::Auth(auth::AuthError::NonceStore(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServerError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServerError::Database(_) | ServerError::Verifier(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            match &self {
                ServerError::InvalidSignature => self.to_string(),
                ServerError::InvalidRequest(msg) | ServerError::NotFound(msg) => msg.clone(),
                ServerError::MalformedState(_) => "Malformed frame state".to_string(),
                ServerError::Database(_) => "Not found".to_string(),
                ServerError::Auth(e) => e.to_string(),
                _ => self.to_string(),
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
