//! Injector Types - core data model for the service registry
//!
//! - **ServiceId**: registrant-chosen identifier, unique across the store
//! - **ServiceRecord**: id, name, address and any opaque domain fields

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod ids;
pub mod record;

pub use ids::ServiceId;
pub use record::{is_reserved_field, validate_id, ServiceRecord, ValidationError, RESERVED_FIELDS};
