//! HTTP-level scenario tests for QWeatherFeed against a local mock server.
//!
//! No real network access: httpmock binds a loopback listener and the feed
//! is pointed at it via `new_with_base_url`.

use httpmock::prelude::*;
use wwd_feed::{FeedError, QWeatherFeed, WarningFeed};

const BODY_TWO_WARNINGS: &str = r#"{
    "code": "200",
    "warning": [
        {
            "id": "a1",
            "typeName": "Rainstorm",
            "status": "active",
            "severityColor": "Yellow",
            "level": "",
            "startTime": "2024-06-01T08:00+08:00"
        },
        {
            "id": "a2",
            "typeName": "Rainstorm",
            "status": "active",
            "severityColor": "Red",
            "level": "",
            "startTime": "2024-06-01T09:00+08:00"
        }
    ]
}"#;

#[tokio::test]
async fn fetch_active_decodes_bulletins_and_sends_credentials() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v7/warning/now")
                .query_param("location", "101280108")
                .query_param("lang", "en")
                .query_param("key", "test-key");
            then.status(200)
                .header("content-type", "application/json")
                .body(BODY_TWO_WARNINGS);
        })
        .await;

    let feed = QWeatherFeed::new_with_base_url(
        "test-key".to_string(),
        "101280108".to_string(),
        server.base_url(),
    );

    let batch = feed.fetch_active().await.unwrap();
    mock.assert_async().await;

    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].id, "a1");
    assert_eq!(batch[0].hazard_type, "Rainstorm");
    assert_eq!(batch[1].severity_color, "Red");
    assert_eq!(batch[1].issued_at, "2024-06-01T09:00+08:00");
}

#[tokio::test]
async fn hazard_free_response_yields_empty_batch() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/v7/warning/now");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"code": "200", "warning": []}"#);
        })
        .await;

    let feed = QWeatherFeed::new_with_base_url(
        "test-key".to_string(),
        "101280108".to_string(),
        server.base_url(),
    );

    let batch = feed.fetch_active().await.unwrap();
    assert!(batch.is_empty());
}

#[tokio::test]
async fn non_2xx_status_is_an_http_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/v7/warning/now");
            then.status(401).body(r#"{"code": "401"}"#);
        })
        .await;

    let feed = QWeatherFeed::new_with_base_url(
        "bad-key".to_string(),
        "101280108".to_string(),
        server.base_url(),
    );

    let err = feed.fetch_active().await.unwrap_err();
    match err {
        FeedError::Http { status } => assert_eq!(status, 401),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/v7/warning/now");
            then.status(200)
                .header("content-type", "application/json")
                .body("<html>not json</html>");
        })
        .await;

    let feed = QWeatherFeed::new_with_base_url(
        "test-key".to_string(),
        "101280108".to_string(),
        server.base_url(),
    );

    let err = feed.fetch_active().await.unwrap_err();
    assert!(matches!(err, FeedError::Decode(_)));
}
