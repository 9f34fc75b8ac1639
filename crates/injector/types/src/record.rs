//! Service records
//!
//! A [`ServiceRecord`] maps a service id to the address it is reachable at.
//! Anything beyond `id`, `ServiceName` and `ServiceAddress` (credentials,
//! bucket names, ...) is kept verbatim in [`ServiceRecord::metadata`] and
//! round-trips untouched. The core wire names are reserved and can never
//! appear among the opaque fields.

use crate::ids::ServiceId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// The unit of registration and resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: ServiceId,

    /// Human-readable label, not unique
    #[serde(rename = "ServiceName")]
    pub name: String,

    /// URL or host:port the service is reachable at
    #[serde(rename = "ServiceAddress")]
    pub address: String,

    /// Domain-specific fields, opaque to the registry
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Reasons a record is rejected before it reaches the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("service id must not be empty")]
    EmptyId,

    #[error("service id must not contain '/': {0}")]
    IdContainsSlash(String),

    #[error("service address must not be empty for {0}")]
    EmptyAddress(String),

    #[error("field name is reserved: {0}")]
    ReservedField(String),
}

/// Wire names owned by the record itself
pub const RESERVED_FIELDS: [&str; 3] = ["id", "ServiceName", "ServiceAddress"];

/// Whether `key` is one of the record's own wire names
pub fn is_reserved_field(key: &str) -> bool {
    RESERVED_FIELDS.contains(&key)
}

impl ServiceRecord {
    pub fn new(
        id: impl Into<ServiceId>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            metadata: Map::new(),
        }
    }

    /// Attach an opaque field, e.g. `Bucket` for object storage services.
    /// Reserved wire names are ignored.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !is_reserved_field(&key) {
            self.metadata.insert(key, value.into());
        }
        self
    }

    /// String-valued opaque field
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Check that the record can be registered and later resolved by path.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_id(&self.id)?;
        if self.address.trim().is_empty() {
            return Err(ValidationError::EmptyAddress(self.id.to_string()));
        }
        if let Some(key) = self.metadata.keys().find(|key| is_reserved_field(key)) {
            return Err(ValidationError::ReservedField(key.clone()));
        }
        Ok(())
    }
}

/// Validate an id used for lookup
pub fn validate_id(id: &ServiceId) -> Result<(), ValidationError> {
    if id.is_blank() {
        return Err(ValidationError::EmptyId);
    }
    if id.as_str().contains('/') {
        return Err(ValidationError::IdContainsSlash(id.to_string()));
    }
    Ok(())
}
