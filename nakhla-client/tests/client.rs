//! Client SDK tests against a `wiremock` API server.

use nakhla_client::{ClientError, RatesClient};
use nakhla_types::RateStatus;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test]
async fn test_rate_decodes_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/rate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ready",
            "rate": {
                "buy": 4.85,
                "sell": 4.9,
                "average": 4.875,
                "updated_at": "2024-01-15",
                "source": "Central Bank of Libya"
            },
            "fetched_at": "2024-01-15T10:00:00Z"
        })))
        .mount(&server)
        .await;

    let snapshot = RatesClient::new(server.uri()).rate().await.unwrap();

    assert_eq!(snapshot.status, RateStatus::Ready);
    assert_eq!(snapshot.average(), Some(4.875));
    assert!(snapshot.fetched_at.is_some());
}

#[tokio::test]
async fn test_api_error_carries_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/usd"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": "Failed to fetch USD rate", "code": 500 })),
        )
        .mount(&server)
        .await;

    let err = RatesClient::new(server.uri()).usd_raw().await.unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to fetch USD rate");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_refresh_posts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/rate/refresh"))
        .respond_with(ResponseTemplate::new(503).set_body_string("gateway down"))
        .expect(1)
        .mount(&server)
        .await;

    let err = RatesClient::new(server.uri()).refresh().await.unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "gateway down");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_ticker_and_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ticker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "idle",
            "pairs": [
                { "pair": "USD", "label": "USD/LYD", "symbol": "$", "rate": null, "display": "---" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy" })))
        .mount(&server)
        .await;

    let client = RatesClient::new(format!("{}/", server.uri()));

    let ticker = client.ticker().await.unwrap();
    assert_eq!(ticker.pairs.len(), 1);
    assert_eq!(ticker.pairs[0].display, "---");
    assert!(client.health().await.unwrap());
}
