mod discovery;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use scout_discovery::JobQueue;
use scout_store::{JobStatusStore, StoreError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, require_bearer_auth, AuthState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub queue: JobQueue,
    pub store: JobStatusStore,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    tracing::error!(error = %error, "job status store query failed");
    ApiError::new(request_id, "internal_error", "job status store query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/discovery", post(discovery::create_discovery))
        .route(
            "/api/v1/discovery/{job_id}",
            get(discovery::get_discovery),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth,
            require_bearer_auth,
        ))
}

pub fn build_app(state: AppState, auth: AuthState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

/// Reads a key that never exists to confirm the store answers.
async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.store.get("health-check").await {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    store: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: job store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        store: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use scout_core::{BatchResult, CanonicalProfile, FilterSpec};
    use scout_discovery::{
        ContactImporter, DiscoveryOrchestrator, NoopNotifier, ProfileSearch,
    };
    use scout_insightiq::{InsightIqError, RawProfile};
    use scout_store::MemoryStore;
    use tower::ServiceExt;

    struct EmptySearch;

    #[async_trait]
    impl ProfileSearch for EmptySearch {
        async fn search(&self, _filters: &FilterSpec) -> Result<Vec<RawProfile>, InsightIqError> {
            Ok(Vec::new())
        }
    }

    struct NoImport;

    #[async_trait]
    impl ContactImporter for NoImport {
        async fn import(&self, profiles: &[CanonicalProfile], _job_id: &str) -> BatchResult {
            BatchResult {
                created: 0,
                skipped: profiles.len(),
            }
        }
    }

    fn app_with_auth(auth: AuthState) -> (Router, JobStatusStore) {
        let store = JobStatusStore::new(Arc::new(MemoryStore::new()));
        let orchestrator = Arc::new(DiscoveryOrchestrator::new(
            Arc::new(EmptySearch),
            Arc::new(NoImport),
            store.clone(),
            Arc::new(NoopNotifier),
        ));
        let (queue, _workers) = JobQueue::start(orchestrator, 1);
        let app = build_app(
            AppState {
                queue,
                store: store.clone(),
            },
            auth,
        );
        (app, store)
    }

    fn app() -> (Router, JobStatusStore) {
        app_with_auth(AuthState::from_keys("", true).expect("auth"))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    fn post_discovery(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/discovery")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::new("req-1", "not_found", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_ok_with_request_id() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-request-id").unwrap(),
            "req-health"
        );
        let json = json_body(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["meta"]["request_id"], "req-health");
    }

    #[tokio::test]
    async fn create_discovery_returns_accepted_job() {
        let (app, store) = app();
        let response = app
            .oneshot(post_discovery(r#"{"platform":"youtube","max_results":50}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let json = json_body(response).await;
        assert_eq!(json["data"]["status"], "queued");
        let job_id = json["data"]["job_id"].as_str().expect("job id").to_string();

        let record = store.get(&job_id).await.unwrap().expect("record written");
        assert_eq!(
            record.filters.map(|f| f.platform),
            Some(scout_core::Platform::Youtube)
        );
    }

    #[tokio::test]
    async fn create_discovery_rejects_invalid_filters() {
        let (app, _) = app();
        let response = app
            .oneshot(post_discovery(r#"{"lookalike_type":"audience"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn create_discovery_rejects_unknown_platform() {
        let (app, _) = app();
        let response = app
            .oneshot(post_discovery(r#"{"platform":"myspace"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/discovery/does-not-exist")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn protected_routes_require_bearer_token() {
        let (app, _) = app_with_auth(AuthState::from_keys("secret-key", false).expect("auth"));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/discovery/anything")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/discovery/anything")
                    .header("authorization", "Bearer secret-key")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
