//! Shared helpers for API integration tests.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the router
//! without an actual TCP listener, through the same middleware stack
//! production uses.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use careops_api::config::ServerConfig;
use careops_api::router::build_app_router;
use careops_api::state::AppState;
use careops_core::impact::analysis::ImpactAnalyzer;
use careops_db::store::PgDependencyStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let store = PgDependencyStore::new(pool.clone());
    let analyzer = Arc::new(ImpactAnalyzer::new(Arc::new(store)));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        analyzer,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to the app.
#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body.
#[allow(dead_code)]
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a PUT request with a JSON body.
#[allow(dead_code)]
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request to the app.
#[allow(dead_code)]
pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as a UTF-8 string.
#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Insert a policy row directly, returning its id. Policy authoring is a
/// separate service, so tests seed the table themselves.
#[allow(dead_code)]
pub async fn seed_policy(pool: &PgPool, title: &str) -> i64 {
    let row: (i64,) = sqlx::query_as("INSERT INTO policies (title) VALUES ($1) RETURNING id")
        .bind(title)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

/// Insert an artifact registry row with an explicit id so tests control the
/// id space (policy and artifact sequences are independent).
#[allow(dead_code)]
pub async fn seed_artifact(
    pool: &PgPool,
    id: i64,
    artifact_type: &str,
    name: &str,
    department: &str,
    is_critical: bool,
) {
    sqlx::query(
        "INSERT INTO dependent_artifacts (id, artifact_type, name, department, is_critical)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(artifact_type)
    .bind(name)
    .bind(department)
    .bind(is_critical)
    .execute(pool)
    .await
    .unwrap();
}

/// Insert a dependency edge directly. Used for transitive edges whose source
/// is an artifact rather than a policy (the HTTP API only creates
/// policy-scoped edges).
#[allow(dead_code)]
pub async fn seed_edge(
    pool: &PgPool,
    source_id: i64,
    dependent_type: &str,
    dependent_id: i64,
    strength: &str,
) {
    sqlx::query(
        "INSERT INTO policy_dependencies
            (source_id, dependent_type, dependent_id, dependency_strength)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(source_id)
    .bind(dependent_type)
    .bind(dependent_id)
    .bind(strength)
    .execute(pool)
    .await
    .unwrap();
}
