#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use todos_api::config::ServerConfig;
use todos_api::router::build_app_router;
use todos_api::state::AppState;
use todos_core::read_plan::QueryParamMode;
use todos_db::store::{MemoryTodoStore, SharedTodoStore};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(mode: QueryParamMode) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        query_param_mode: mode,
        ..ServerConfig::default()
    }
}

/// Build the full application router backed by a fresh in-memory store,
/// in strict query parameter mode.
///
/// The router is cheap to clone and every clone shares the same store, so
/// a test can issue several requests against one dataset.
pub fn build_test_app() -> Router {
    build_test_app_with_mode(QueryParamMode::Strict)
}

pub fn build_test_app_with_mode(mode: QueryParamMode) -> Router {
    build_test_app_with_store(Arc::new(MemoryTodoStore::new()), test_config(mode))
}

/// Build the router over an arbitrary store and configuration.
pub fn build_test_app_with_store(store: SharedTodoStore, config: ServerConfig) -> Router {
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PATCH, uri, body).await
}

async fn send_json(app: &Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a todo and return its `data` object.
pub async fn create_todo(app: &Router, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app, "/api/todos", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
