//! Registry error types

use injector_types::{ServiceId, ValidationError};
use thiserror::Error;

/// Errors raised by a [`ServiceStore`](crate::store::ServiceStore) backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this id is already persisted
    #[error("Duplicate service id: {0}")]
    Duplicate(ServiceId),

    /// Backend unreachable or pool exhausted
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query failed in the backend
    #[error("Query error: {0}")]
    Query(String),

    /// Stored document could not be encoded or decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by [`Registry`](crate::Registry) operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Service not found: {0}")]
    NotFound(ServiceId),

    #[error("Service already exists: {0}")]
    AlreadyExists(ServiceId),

    /// Transient: the store could not be reached or timed out
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Whether a caller may retry the same request later
    pub fn is_transient(&self) -> bool {
        matches!(self, RegistryError::StoreUnavailable(_))
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(id) => RegistryError::AlreadyExists(id),
            StoreError::Connection(msg) | StoreError::Query(msg) => {
                RegistryError::StoreUnavailable(msg)
            }
            StoreError::InvalidData(msg) => RegistryError::Internal(msg),
        }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let err: RegistryError = StoreError::Duplicate(ServiceId::new("x")).into();
        assert!(matches!(err, RegistryError::AlreadyExists(_)));

        let err: RegistryError = StoreError::Connection("refused".into()).into();
        assert!(err.is_transient());

        let err: RegistryError = StoreError::InvalidData("bad json".into()).into();
        assert!(matches!(err, RegistryError::Internal(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_not_found_is_not_transient() {
        assert!(!RegistryError::NotFound(ServiceId::new("missing")).is_transient());
    }
}
