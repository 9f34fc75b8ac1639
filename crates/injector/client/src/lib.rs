//! Injector Client - caller-side SDK
//!
//! Caller front-ends resolve a service id through the injector, then call the
//! returned address themselves. This crate provides:
//!
//! - **InjectorClient**: `resolve`, `register`, `health` and `ready` over HTTP
//! - **ClientError**: separates permanent `NotFound` from retryable
//!   `Unavailable`
//! - **InvocationPayload**: the `{"message": "<millis>"}` latency envelope

#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod payload;

pub use client::{InjectorClient, DEFAULT_INJECTOR_URL, INJECTOR_URL_ENV};
pub use error::{ClientError, Result};
pub use payload::InvocationPayload;
