//! Integration tests for the HTTP adapter.
//!
//! Requests go through the full router (CORS, tracing and metrics layers)
//! against a `wiremock` upstream.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use exchange_rates::UpstreamClient;
use nakhla_hex::RateProvider;
use nakhla_hex::inbound::{CorsPolicy, Environment, HttpServer};
use nakhla_store::{MemoryStore, RateCache};
use nakhla_types::RateConfig;

fn upstream_payload() -> Value {
    json!({
        "status": "success",
        "data": [{ "buy": "4.85.", "sell": "4.90.", "avg": "4.875.", "date": "2024-01-15" }]
    })
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn server_for(upstream: &MockServer) -> HttpServer<UpstreamClient, MemoryStore> {
    let config = RateConfig::default()
        .with_endpoint(format!("{}/", upstream.uri()))
        .with_timeout(Duration::from_secs(2));
    let client = UpstreamClient::new(&config).unwrap();
    let cache = RateCache::new(MemoryStore::new(), &config);
    let provider = Arc::new(RateProvider::new(client, cache));
    HttpServer::new(provider, CorsPolicy::for_environment(Environment::Production))
}

async fn app_for(upstream: &MockServer) -> Router {
    server_for(upstream).router()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let upstream = MockServer::start().await;
    let app = app_for(&upstream).await;

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_proxy_relays_upstream_body_verbatim() {
    let upstream = MockServer::start().await;
    let document = json!({
        "status": "success",
        "data": [{ "buy": "4.85.", "sell": "4.90.", "avg": "4.875.", "date": "2024-01-15" }],
        "extra": { "note": "kept as is" }
    });
    mount(&upstream, ResponseTemplate::new(200).set_body_json(document.clone())).await;
    let app = app_for(&upstream).await;

    let response = app.oneshot(get("/api/usd")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, document);
}

#[tokio::test]
async fn test_proxy_hides_upstream_failure_details() {
    let upstream = MockServer::start().await;
    mount(&upstream, ResponseTemplate::new(503).set_body_string("maintenance")).await;
    let app = app_for(&upstream).await;

    let response = app.oneshot(get("/api/usd")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to fetch USD rate");
    assert_eq!(body["code"], 500);
}

#[tokio::test]
async fn test_proxy_timeout_is_generic_failure() {
    let upstream = MockServer::start().await;
    mount(
        &upstream,
        ResponseTemplate::new(200)
            .set_body_json(upstream_payload())
            .set_delay(Duration::from_secs(5)),
    )
    .await;
    let app = app_for(&upstream).await;

    let response = app.oneshot(get("/api/usd")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to fetch USD rate");
}

#[tokio::test]
async fn test_rate_is_normalized_and_cached() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_payload()))
        .expect(1)
        .mount(&upstream)
        .await;
    let app = app_for(&upstream).await;

    let first = app.clone().oneshot(get("/api/rate")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let body = body_json(first).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["rate"]["buy"], 4.85);
    assert_eq!(body["rate"]["sell"], 4.90);
    assert_eq!(body["rate"]["average"], 4.875);
    assert_eq!(body["rate"]["updated_at"], "2024-01-15");
    assert_eq!(body["rate"]["source"], "Central Bank of Libya");

    // Fresh cache: no second upstream call (verified by `expect(1)`)
    let second = app.oneshot(get("/api/rate")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rate_unavailable_without_any_good_fetch() {
    let upstream = MockServer::start().await;
    mount(&upstream, ResponseTemplate::new(500)).await;
    let app = app_for(&upstream).await;

    let response = app.oneshot(get("/api/rate")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], 503);
    assert!(body["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_refresh_keeps_last_good_rate_on_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_payload()))
        .up_to_n_times(1)
        .mount(&upstream)
        .await;
    mount(&upstream, ResponseTemplate::new(502)).await;
    let app = app_for(&upstream).await;

    let ok = app.clone().oneshot(get("/api/rate")).await.unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/rate/refresh")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["rate"]["buy"], 4.85);
    assert!(body["error"].as_str().unwrap().contains("502"));
}

#[tokio::test]
async fn test_ticker_placeholders_when_unavailable() {
    let upstream = MockServer::start().await;
    mount(&upstream, ResponseTemplate::new(503)).await;
    let app = app_for(&upstream).await;

    let response = app.oneshot(get("/api/ticker")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    let pairs = body["pairs"].as_array().unwrap();
    assert_eq!(pairs.len(), 3);
    assert!(pairs.iter().all(|p| p["display"] == "---" && p["rate"].is_null()));
}

#[tokio::test]
async fn test_ticker_derives_pairs() {
    let upstream = MockServer::start().await;
    mount(&upstream, ResponseTemplate::new(200).set_body_json(upstream_payload())).await;
    let app = app_for(&upstream).await;

    let response = app.oneshot(get("/api/ticker")).await.unwrap();
    let body = body_json(response).await;

    let displays: Vec<&str> = body["pairs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["display"].as_str().unwrap())
        .collect();
    assert_eq!(displays, vec!["4.8750", "5.2650", "6.0938"]);
}

#[tokio::test]
async fn test_cors_allows_listed_origin() {
    let upstream = MockServer::start().await;
    let app = app_for(&upstream).await;

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://alnakhla.ly")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://alnakhla.ly"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_rejects_unlisted_origin() {
    let upstream = MockServer::start().await;
    let app = app_for(&upstream).await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/usd")
        .header(header::ORIGIN, "https://evil.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let upstream = MockServer::start().await;
    let app = app_for(&upstream).await;

    let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/usd"].is_object());
}

#[tokio::test]
async fn test_static_fallback_serves_index() {
    let upstream = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>nakhla</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
    let app = server_for(&upstream).with_static_dir(dir.path()).router();

    let asset = app.clone().oneshot(get("/app.js")).await.unwrap();
    assert_eq!(asset.status(), StatusCode::OK);

    let route = app.oneshot(get("/rates/today")).await.unwrap();
    assert_eq!(route.status(), StatusCode::OK);
    let body = route.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"<html>nakhla</html>");
}
