//! Service registration and resolution handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use injector_types::ServiceRecord;
use serde::{Deserialize, Serialize};

/// Register service response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterServiceResponse {
    pub id: String,
    pub registered: bool,
}

/// Resolve a service id to its record
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ServiceRecord>> {
    let record = state.registry.resolve(&id).await?;
    Ok(Json(record))
}

/// Register a new service
pub async fn register_service(
    State(state): State<AppState>,
    payload: Result<Json<ServiceRecord>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisterServiceResponse>)> {
    let Json(record) = payload?;
    let id = state.registry.register(record).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterServiceResponse {
            id: id.to_string(),
            registered: true,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use injector_types::ServiceRecord;
    use serde_json::json;
    use std::sync::Arc;

    fn hello_json() -> serde_json::Value {
        json!({
            "id": "hello",
            "ServiceName": "hello-world",
            "ServiceAddress": "http://svc:9000"
        })
    }

    #[tokio::test]
    async fn register_then_resolve_returns_exact_record() {
        let (app, _) = test_router();

        let resp = send(&app, post_json("/services", &hello_json())).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(resp).await,
            json!({"id": "hello", "registered": true})
        );

        let resp = send(&app, get("/services/hello")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, hello_json());
    }

    #[tokio::test]
    async fn missing_service_is_404_with_fixed_body() {
        let (app, _) = test_router();

        let resp = send(&app, get("/services/missing")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await, json!({"error": "service not found"}));
    }

    #[tokio::test]
    async fn resolve_populates_cache() {
        let (app, registry) = test_router();
        registry
            .register(ServiceRecord::new("acl", "acl", "http://opa:8181"))
            .await
            .unwrap();
        assert!(registry.cache().is_empty());

        let resp = send(&app, get("/services/acl")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(registry.cache().get("acl").is_some());
    }

    #[tokio::test]
    async fn opaque_fields_round_trip() {
        let (app, _) = test_router();
        let minio = json!({
            "id": "minio",
            "ServiceName": "object-store",
            "ServiceAddress": "minio:9000",
            "Admin": "admin",
            "Password": "secret",
            "Bucket": "uploads"
        });

        let resp = send(&app, post_json("/services", &minio)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = send(&app, get("/services/minio")).await;
        assert_eq!(body_json(resp).await, minio);
    }

    #[tokio::test]
    async fn duplicate_registration_is_409() {
        let (app, _) = test_router();
        send(&app, post_json("/services", &hello_json())).await;

        let resp = send(&app, post_json("/services", &hello_json())).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("hello"));
    }

    #[tokio::test]
    async fn register_during_store_outage_is_503() {
        let (app, registry) = router_with_store(Arc::new(DownStore));

        let resp = send(&app, post_json("/services", &hello_json())).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("connection refused"));
        assert!(registry.cache().is_empty());
    }

    #[tokio::test]
    async fn missing_service_name_is_400() {
        let (app, _) = test_router();
        let body = json!({"id": "noname", "ServiceAddress": "http://svc:1"});

        let resp = send(&app, post_json("/services", &body)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());

        let resp = send(&app, get("/services/noname")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_id_is_400() {
        let (app, _) = test_router();
        let body = json!({"id": "", "ServiceName": "x", "ServiceAddress": "http://x"});

        let resp = send(&app, post_json("/services", &body)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (app, _) = test_router();
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/services")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();

        let resp = send(&app, request).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await["error"].is_string());
    }
}
