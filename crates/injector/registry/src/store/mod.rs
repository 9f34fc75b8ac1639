//! Persistent stores for service records
//!
//! The store is the system of record: one document per service, keyed by id.

mod memory;
mod postgres;

pub use memory::InMemoryServiceStore;
pub use postgres::PostgresServiceStore;

use crate::error::StoreResult;
use async_trait::async_trait;
use injector_types::ServiceRecord;

/// Keyed document store holding one record per service id
#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// Persist a new record. Fails with `StoreError::Duplicate` if the id exists.
    async fn insert(&self, record: ServiceRecord) -> StoreResult<()>;

    /// Find a record by id
    async fn find(&self, id: &str) -> StoreResult<Option<ServiceRecord>>;

    /// Cheap reachability check
    async fn ping(&self) -> StoreResult<()>;

    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;
}
