//! In-memory store for development and testing

use super::ServiceStore;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use injector_types::{ServiceId, ServiceRecord};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory service store
///
/// Not durable: records live as long as the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceStore {
    records: Arc<RwLock<HashMap<ServiceId, ServiceRecord>>>,
}

impl InMemoryServiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl ServiceStore for InMemoryServiceStore {
    async fn insert(&self, record: ServiceRecord) -> StoreResult<()> {
        let mut records = self.records.write().await;
        match records.entry(record.id.clone()) {
            Entry::Occupied(entry) => Err(StoreError::Duplicate(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    async fn find(&self, id: &str) -> StoreResult<Option<ServiceRecord>> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryServiceStore::new();
        let record = ServiceRecord::new("hello", "hello-world", "http://svc:9000");

        store.insert(record.clone()).await.unwrap();

        let found = store.find("hello").await.unwrap();
        assert_eq!(found, Some(record));
        assert!(store.find("missing").await.unwrap().is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let store = InMemoryServiceStore::new();
        store
            .insert(ServiceRecord::new("acl", "acl", "http://opa:8181"))
            .await
            .unwrap();

        let err = store
            .insert(ServiceRecord::new("acl", "other", "http://elsewhere"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(id) if id.as_str() == "acl"));

        // First registration wins
        let found = store.find("acl").await.unwrap().unwrap();
        assert_eq!(found.address, "http://opa:8181");
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryServiceStore::new();
        let handle = store.clone();
        store
            .insert(ServiceRecord::new("minio", "minio", "minio:9000"))
            .await
            .unwrap();
        assert!(handle.find("minio").await.unwrap().is_some());
    }
}
