//! Registry service
//!
//! Coordinates the resolution cache and the service store. `resolve` serves
//! from the cache when it can and falls back to the store on a miss; only a
//! successful store read ever writes to the cache. `register` writes to the
//! store only.

use crate::cache::ResolutionCache;
use crate::error::{RegistryError, Result, StoreResult};
use crate::store::ServiceStore;
use injector_types::{validate_id, ServiceId, ServiceRecord};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default bound on a single store round trip
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a resolved record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveSource {
    Cache,
    Store,
}

impl ResolveSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveSource::Cache => "cache",
            ResolveSource::Store => "store",
        }
    }
}

/// Service registry with a read-through resolution cache
pub struct Registry {
    store: Arc<dyn ServiceStore>,
    cache: Arc<ResolutionCache>,
    store_timeout: Duration,
}

impl Registry {
    pub fn new(store: Arc<dyn ServiceStore>, cache: Arc<ResolutionCache>) -> Self {
        Self {
            store,
            cache,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Persist a new service record.
    ///
    /// The cache is left untouched; the first resolve reads the stored copy.
    pub async fn register(&self, record: ServiceRecord) -> Result<ServiceId> {
        record.validate()?;

        let id = record.id.clone();
        self.bounded("insert", self.store.insert(record)).await?;

        tracing::info!(service_id = %id, backend = self.store.backend(), "Registered service");
        Ok(id)
    }

    /// Resolve a service id to its record.
    pub async fn resolve(&self, id: &str) -> Result<ServiceRecord> {
        self.resolve_traced(id).await.map(|(record, _)| record)
    }

    /// Resolve and report whether the record came from the cache or the store.
    pub async fn resolve_traced(&self, id: &str) -> Result<(ServiceRecord, ResolveSource)> {
        let id = ServiceId::new(id);
        validate_id(&id)?;

        let start = Instant::now();

        if let Some(record) = self.cache.get(id.as_str()) {
            tracing::info!(
                service_id = %id,
                source = ResolveSource::Cache.as_str(),
                elapsed_ms = elapsed_ms(start),
                "Service retrieved"
            );
            return Ok((record, ResolveSource::Cache));
        }

        let found = match self.bounded("find", self.store.find(id.as_str())).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(service_id = %id, error = %err, "Store lookup failed");
                return Err(err);
            }
        };

        let Some(record) = found else {
            tracing::info!(service_id = %id, "Service not found");
            return Err(RegistryError::NotFound(id));
        };

        // Concurrent misses for the same id may each write here; the content
        // is identical so the last writer winning is harmless.
        self.cache.put(id.clone(), record.clone());

        tracing::info!(
            service_id = %id,
            source = ResolveSource::Store.as_str(),
            elapsed_ms = elapsed_ms(start),
            "Service retrieved"
        );
        Ok((record, ResolveSource::Store))
    }

    /// Check that the store answers within the store timeout.
    pub async fn ping_store(&self) -> Result<()> {
        self.bounded("ping", self.store.ping()).await
    }

    /// Run one store call under the store timeout. A timeout is reported as
    /// `StoreUnavailable`, never as a missing record.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = StoreResult<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result.map_err(RegistryError::from),
            Err(_) => Err(RegistryError::StoreUnavailable(format!(
                "store {} timed out after {}ms",
                operation,
                self.store_timeout.as_millis()
            ))),
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
