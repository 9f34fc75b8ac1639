//! Error types for injector-daemon

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use injector_registry::{RegistryError, StoreError};
use serde::Serialize;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// Store could not be reached at startup
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request body
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Registry operation failed
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Registry(err) => match err {
                RegistryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
                RegistryError::AlreadyExists(_) => StatusCode::CONFLICT,
                RegistryError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                RegistryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            // Callers match on this exact body
            ApiError::Registry(RegistryError::NotFound(_)) => "service not found".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;
    use injector_types::{ServiceId, ValidationError};

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            status_of(RegistryError::InvalidInput(ValidationError::EmptyId)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(RegistryError::NotFound(ServiceId::new("x"))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RegistryError::AlreadyExists(ServiceId::new("x"))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(RegistryError::StoreUnavailable("timeout".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(RegistryError::Internal("bad doc".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ApiError::BadRequest("eof".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::from(RegistryError::NotFound(ServiceId::new("missing")));
        assert_eq!(err.message(), "service not found");
    }
}
