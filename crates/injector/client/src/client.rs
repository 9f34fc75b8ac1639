//! HTTP client for the injector API

use crate::error::{ClientError, Result};
use injector_types::ServiceRecord;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::time::{Duration, Instant};

/// In-cluster address of the injector service
pub const DEFAULT_INJECTOR_URL: &str = "http://injector.default.svc.cluster.local";

/// Environment variable holding the injector base URL
pub const INJECTOR_URL_ENV: &str = "INJECTOR_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Caller-side client for resolving and registering services
#[derive(Debug, Clone)]
pub struct InjectorClient {
    base_url: Url,
    http: Client,
}

impl InjectorClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Build a client whose requests are bounded by `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self { base_url, http })
    }

    /// Client for `INJECTOR_URL`, falling back to the in-cluster default
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(INJECTOR_URL_ENV).unwrap_or_else(|_| DEFAULT_INJECTOR_URL.into());
        Self::new(&url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a service id via `GET /services/{id}`
    pub async fn resolve(&self, id: &str) -> Result<ServiceRecord> {
        self.resolve_timed(id).await.map(|(record, _)| record)
    }

    /// Resolve and report how long the round trip took
    pub async fn resolve_timed(&self, id: &str) -> Result<(ServiceRecord, Duration)> {
        let url = self.endpoint(&["services", id]);
        let start = Instant::now();

        let response = self.http.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(error_for(response, id).await);
        }

        let record: ServiceRecord = response.json().await?;
        let elapsed = start.elapsed();

        tracing::info!(
            service_id = %id,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Service retrieved"
        );
        Ok((record, elapsed))
    }

    /// Register a service via `POST /services`
    pub async fn register(&self, record: &ServiceRecord) -> Result<()> {
        let url = self.endpoint(&["services"]);
        let response = self.http.post(url).json(record).send().await?;

        if response.status() != StatusCode::CREATED {
            return Err(error_for(response, record.id.as_str()).await);
        }

        tracing::info!(service_id = %record.id, "Registered service");
        Ok(())
    }

    /// Liveness check via `GET /health`
    pub async fn health(&self) -> Result<()> {
        let response = self.http.get(self.endpoint(&["health"])).send().await?;
        if response.status() != StatusCode::OK {
            return Err(error_for(response, "").await);
        }
        Ok(())
    }

    /// Readiness check via `GET /health/ready`; false when the store is down
    pub async fn ready(&self) -> Result<bool> {
        let response = self
            .http
            .get(self.endpoint(&["health", "ready"]))
            .send()
            .await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::SERVICE_UNAVAILABLE => Ok(false),
            _ => Err(error_for(response, "").await),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in the constructor
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Classify a non-success response
async fn error_for(response: Response, id: &str) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(id.to_string()),
        StatusCode::CONFLICT => ClientError::AlreadyExists(id.to_string()),
        StatusCode::BAD_REQUEST => ClientError::Rejected(message),
        s if s.is_server_error() => ClientError::Unavailable(format!("{}: {}", s, message)),
        s => ClientError::Unexpected {
            status: s.as_u16(),
            body: message,
        },
    }
}
