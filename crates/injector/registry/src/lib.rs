//! Injector Registry - service registration and cached resolution
//!
//! This crate provides the core of the injector:
//!
//! - **ResolutionCache**: concurrent in-process id -> record map
//! - **ServiceStore**: the persistent, authoritative keyed document store
//! - **Registry**: `register` and `resolve` over cache and store
//!
//! ## Backends
//!
//! `InMemoryServiceStore` is suitable for development and testing.
//! `PostgresServiceStore` keeps one JSONB document per service.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod cache;
pub mod error;
pub mod registry;
pub mod store;

// Re-exports
pub use cache::{CacheConfig, ResolutionCache};
pub use error::{RegistryError, Result, StoreError, StoreResult};
pub use registry::{Registry, ResolveSource, DEFAULT_STORE_TIMEOUT};
pub use store::{InMemoryServiceStore, PostgresServiceStore, ServiceStore};
