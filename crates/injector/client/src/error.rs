//! Client error types

use thiserror::Error;

/// Errors returned by [`InjectorClient`](crate::InjectorClient)
#[derive(Debug, Error)]
pub enum ClientError {
    /// No record for this id. Permanent; do not retry.
    #[error("Service not found: {0}")]
    NotFound(String),

    #[error("Service already exists: {0}")]
    AlreadyExists(String),

    /// The injector rejected the request as malformed
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Injector or its store unreachable. Retry with backoff.
    #[error("Injector unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected response ({status}): {body}")]
    Unexpected { status: u16, body: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid injector URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client itself could not be set up
    #[error("HTTP client setup failed: {0}")]
    Setup(String),

    /// Inbound caller payload could not be interpreted
    #[error("Invalid payload: {0}")]
    Payload(String),
}

impl ClientError {
    /// Whether the same request may succeed later
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Unavailable(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Unavailable(err.to_string())
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
