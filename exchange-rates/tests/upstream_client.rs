//! Integration tests for the upstream HTTP adapter.
//!
//! A `wiremock` server stands in for the upstream rate API.

use std::time::Duration;

use exchange_rates::UpstreamClient;
use nakhla_types::{FetchError, RateConfig, RateSource};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn client_for(server: &MockServer, timeout: Duration) -> UpstreamClient {
    let config = RateConfig::default()
        .with_endpoint(format!("{}/", server.uri()))
        .with_timeout(timeout);
    UpstreamClient::new(&config).unwrap()
}

fn reference_payload() -> serde_json::Value {
    json!({
        "status": "success",
        "data": [{ "buy": "4.85.", "sell": "4.90.", "avg": "4.875.", "date": "2024-01-01" }]
    })
}

#[tokio::test]
async fn test_fetch_normalizes_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("accept", "application/json"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reference_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server, Duration::from_secs(5))
        .fetch()
        .await
        .unwrap();

    assert_eq!(record.buy, 4.85);
    assert_eq!(record.sell, 4.90);
    assert_eq!(record.average, 4.875);
    assert_eq!(record.updated_at.as_deref(), Some("2024-01-01"));
}

#[tokio::test]
async fn test_fetch_raw_is_verbatim() {
    let server = MockServer::start().await;
    let body = json!({
        "status": "success",
        "data": [{ "buy": "4.85.", "sell": "4.90.", "avg": "4.875.", "date": "2024-01-01", "extra": true }],
        "meta": { "source": "cbl" }
    });
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let raw = client_for(&server, Duration::from_secs(5))
        .fetch_raw()
        .await
        .unwrap();

    assert_eq!(raw, body);
}

#[tokio::test]
async fn test_non_success_status_is_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = client_for(&server, Duration::from_secs(5)).fetch().await;

    assert!(matches!(result, Err(FetchError::Upstream(503))));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reference_payload())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = client_for(&server, Duration::from_millis(200)).fetch().await;

    assert!(matches!(result, Err(FetchError::Timeout(t)) if t == Duration::from_millis(200)));
}

#[tokio::test]
async fn test_non_json_body_is_invalid_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server, Duration::from_secs(5)).fetch_raw().await;

    assert!(matches!(result, Err(FetchError::InvalidPayload(_))));
}

#[tokio::test]
async fn test_zeroed_rates_are_invalid_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{ "buy": "0.", "sell": "4.90.", "avg": "2.45", "date": "2024-01-01" }]
        })))
        .mount(&server)
        .await;

    let result = client_for(&server, Duration::from_secs(5)).fetch().await;

    assert!(matches!(result, Err(FetchError::InvalidPayload(_))));
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport_error() {
    let config = RateConfig::default()
        .with_endpoint("http://127.0.0.1:9/")
        .with_timeout(Duration::from_secs(2));
    let client = UpstreamClient::new(&config).unwrap();

    let result = client.fetch().await;

    assert!(matches!(
        result,
        Err(FetchError::Transport(_)) | Err(FetchError::Timeout(_))
    ));
}
