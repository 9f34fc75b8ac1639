//! Configuration for injector-daemon

use injector_registry::CacheConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InjectorConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Resolution cache policy
    #[serde(default)]
    pub cache: CacheConfig,

    /// Registry configuration
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default)]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: false,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory storage (for development/testing)
    #[default]
    Memory,

    /// PostgreSQL storage
    Postgres {
        /// Connection URL
        url: String,

        /// Maximum connections in pool
        #[serde(default = "default_pool_size")]
        max_connections: u32,

        /// Connection timeout in seconds
        #[serde(default = "default_connection_timeout")]
        connect_timeout_secs: u64,
    },
}

impl StorageConfig {
    /// Postgres storage with default pool settings
    pub fn postgres(url: impl Into<String>) -> Self {
        StorageConfig::Postgres {
            url: url.into(),
            max_connections: default_pool_size(),
            connect_timeout_secs: default_connection_timeout(),
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Bound on each store round trip, in milliseconds
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout(),
        }
    }
}

impl RegistryConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_pool_size() -> u32 {
    10
}

fn default_connection_timeout() -> u64 {
    10
}

fn default_store_timeout() -> u64 {
    5_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl InjectorConfig {
    /// Load configuration from defaults, an optional file, then the
    /// environment (`INJECTOR_` prefix, `__` between nested keys, e.g.
    /// `INJECTOR_REGISTRY__STORE_TIMEOUT_MS=2000`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&InjectorConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("INJECTOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InjectorConfig::default();
        assert_eq!(config.server.listen_addr.port(), 5000);
        assert_eq!(config.storage, StorageConfig::Memory);
        assert_eq!(config.cache, CacheConfig::default());
        assert_eq!(config.registry.store_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_postgres_defaults() {
        let StorageConfig::Postgres {
            url,
            max_connections,
            connect_timeout_secs,
        } = StorageConfig::postgres("postgres://localhost/services")
        else {
            panic!("expected postgres storage");
        };
        assert_eq!(url, "postgres://localhost/services");
        assert_eq!(max_connections, 10);
        assert_eq!(connect_timeout_secs, 10);
    }

    #[test]
    fn test_storage_config_from_json() {
        let storage: StorageConfig =
            serde_json::from_str(r#"{"type":"postgres","url":"postgres://db/services"}"#).unwrap();
        assert_eq!(storage, StorageConfig::postgres("postgres://db/services"));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = InjectorConfig::load(None).unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }
}
