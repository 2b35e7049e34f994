#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use origen_api::config::ServerConfig;
use origen_api::previews::PreviewCache;
use origen_api::router::build_app_router;
use origen_api::state::AppState;
use origen_api::store::{MemoryStore, SellerStore};
use origen_core::seller_status::SellerStatus;
use origen_payments::mock::MockProcessor;

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
        max_upload_body_mb: 25,
        database_url: None,
    }
}

/// Test state over the in-memory store and the mock payment processor.
pub fn test_state() -> AppState {
    AppState {
        store: Arc::new(MemoryStore::new()),
        payments: Arc::new(MockProcessor::new()),
        previews: Arc::new(PreviewCache::new()),
        config: Arc::new(test_config()),
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, &body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, &body)).await
}

/// POST with no body.
pub async fn post(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// A file part for [`post_multipart`]: `(file name, content type, bytes)`.
pub type FilePart<'a> = (&'a str, &'a str, &'a [u8]);

const BOUNDARY: &str = "origen-test-boundary";

/// POST a `multipart/form-data` body with one `files` part per entry.
pub async fn post_multipart(app: Router, uri: &str, files: &[FilePart<'_>]) -> Response<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn registration_body(email: &str) -> Value {
    json!({
        "contactName": "Lucía",
        "contactSurname": "García Pérez",
        "email": email,
        "phone": "+34 612 345 678",
        "businessName": "Huerta del Jarama",
        "businessType": "autonomo",
        "province": "madrid",
        "city": "Aranjuez",
        "producerCategory": "vegetales",
        "whyOrigin": "Cultivamos verdura de temporada en la vega del Jarama desde hace tres generaciones.",
        "acceptsTerms": true,
        "acceptsPrivacy": true
    })
}

/// Register a seller and return its id.
pub async fn register_seller(state: &AppState, email: &str) -> i64 {
    let response = post_json(
        build_test_app(state.clone()),
        "/api/sellers/register",
        registration_body(email),
    )
    .await;
    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}

/// Register a seller and move it to `approved_access`.
pub async fn approved_seller(state: &AppState, email: &str) -> i64 {
    let id = register_seller(state, email).await;
    state
        .store
        .update_seller_status(id, SellerStatus::ApprovedAccess)
        .await
        .unwrap();
    id
}

/// Start a wizard for an approved seller and return the session id.
pub async fn start_session(state: &AppState, seller_id: i64) -> i64 {
    let response = post_json(
        build_test_app(state.clone()),
        "/api/onboarding-sessions",
        json!({ "sellerId": seller_id }),
    )
    .await;
    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}
