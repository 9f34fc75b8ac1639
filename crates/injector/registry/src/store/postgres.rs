//! PostgreSQL store
//!
//! Records live in a single `services` table as JSONB documents keyed by id.
//! The primary key enforces id uniqueness.

use super::ServiceStore;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use injector_types::ServiceRecord;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::Duration;

/// PostgreSQL-backed service store
#[derive(Debug, Clone)]
pub struct PostgresServiceStore {
    pool: PgPool,
}

impl PostgresServiceStore {
    /// Connect to PostgreSQL and initialize the schema.
    ///
    /// The pool is created once and shared by every request for the life of
    /// the process.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> StoreResult<Self> {
        let connecting = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(url);

        let pool = tokio::time::timeout(connect_timeout, connecting)
            .await
            .map_err(|_| {
                StoreError::Connection(format!(
                    "timed out after {}s connecting to postgres",
                    connect_timeout.as_secs()
                ))
            })?
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.initialize_schema().await?;
        Ok(store)
    }

    async fn initialize_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS services (
                id TEXT PRIMARY KEY,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[async_trait]
impl ServiceStore for PostgresServiceStore {
    async fn insert(&self, record: ServiceRecord) -> StoreResult<()> {
        let data = serde_json::to_value(&record)
            .map_err(|e| StoreError::InvalidData(format!("json serialize error: {}", e)))?;

        let result = sqlx::query(
            r#"
            INSERT INTO services (id, data, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(record.id.as_str())
        .bind(data)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate(record.id));
        }
        Ok(())
    }

    async fn find(&self, id: &str) -> StoreResult<Option<ServiceRecord>> {
        let row = sqlx::query("SELECT data FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let data: Value = row.try_get("data").map_err(map_sqlx_error)?;
                let record = serde_json::from_value(data).map_err(|e| {
                    StoreError::InvalidData(format!("json deserialize error: {}", e))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Connectivity failures become `Connection` so the registry reports them as
/// transient; decode failures are data problems, not outages.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Connection(err.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::InvalidData(err.to_string())
        }
        _ => StoreError::Query(err.to_string()),
    }
}
