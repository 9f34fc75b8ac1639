//! Injector Daemon library
//!
//! This module provides the components of the injector daemon:
//! - REST API handlers (resolve, register, health)
//! - Configuration loading
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use config::InjectorConfig;
pub use error::{ApiError, DaemonError};
pub use server::Server;
