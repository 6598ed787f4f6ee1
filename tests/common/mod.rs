#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use baby_match_back::{
    build_router,
    dao::game_store::memory::InMemoryGameStore,
    state::{AppState, catalog::Catalog},
};

/// Router over the built-in catalog and an empty in-memory store.
pub async fn test_app() -> Router {
    let state =
        AppState::with_store(Catalog::default(), Arc::new(InMemoryGameStore::new())).await;
    build_router(state)
}

/// Router with no store installed, as during a database outage.
pub fn degraded_app() -> Router {
    build_router(AppState::new(Catalog::default()))
}

/// Send a GET request to the app and return (status, body).
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

/// Send a POST request with an optional JSON body and return (status, body).
pub async fn post_json(app: &Router, uri: &str, payload: Option<&Value>) -> (StatusCode, String) {
    let body = payload.map(Value::to_string).unwrap_or_default();
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_default();
    send(app, request).await
}

/// Parse a response body as JSON, panicking with the raw body on failure.
pub fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|err| panic!("invalid JSON ({err}): {body}"))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap_or_default();

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let body_str = String::from_utf8(body.to_vec()).unwrap_or_default();

    (status, body_str)
}
