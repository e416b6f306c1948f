//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_client(max_retries: u32) -> HttpClient {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(5))
        .retry(RetryPolicy::new(max_retries, Duration::from_millis(10)))
        .build();
    HttpClient::new(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.retry, RetryPolicy::default());
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("catalog-harvest/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .rate_limit(RateLimiterConfig::per_second(4))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.retry.base_delay, Duration::from_millis(1000));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(4, 4)));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");

    let client = HttpClient::new(config).unwrap();
    let debug = format!("{client:?}");
    assert!(debug.contains("has_rate_limiter: true"));
    assert!(debug.contains("max_retries: 5"));
}

#[tokio::test]
async fn test_post_json_sends_body_and_parses_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_json(json!({"offset": 0, "limit": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 42})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = fast_client(3);
    let value = client
        .post_json(
            &format!("{}/api", mock_server.uri()),
            &HashMap::new(),
            &json!({"offset": 0, "limit": 1}),
        )
        .await
        .unwrap();

    assert_eq!(value["count"], 42);
}

#[tokio::test]
async fn test_post_json_sends_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("X-Api-Key", "secret"))
        .and(header("X-Request-Id", "req-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .header("X-Api-Key", "secret")
        .build();
    let client = HttpClient::new(config).unwrap();
    let headers = HashMap::from([("X-Request-Id".to_string(), "req-1".to_string())]);

    client
        .post_json(&mock_server.uri(), &headers, &json!({}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_retry_on_503_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = fast_client(3);
    let value = client
        .post_json(&mock_server.uri(), &HashMap::new(), &json!({}))
        .await
        .unwrap();

    assert_eq!(value["ok"], true);
}

#[tokio::test]
async fn test_no_retry_on_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = fast_client(3);
    let err = client
        .post_json(&mock_server.uri(), &HashMap::new(), &json!({}))
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "missing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_no_retry_on_429() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = fast_client(3);
    let err = client
        .post_json(&mock_server.uri(), &HashMap::new(), &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 429, .. }));
}

#[tokio::test]
async fn test_retries_exhausted_on_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&mock_server)
        .await;

    let client = fast_client(3);
    let err = client
        .post_json(&mock_server.uri(), &HashMap::new(), &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_timeout_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .timeout(Duration::from_millis(50))
        .retry(RetryPolicy::new(1, Duration::from_millis(10)))
        .build();
    let client = HttpClient::new(config).unwrap();

    let err = client
        .post_json(&mock_server.uri(), &HashMap::new(), &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { timeout_ms: 50 }));
}

#[tokio::test]
async fn test_connection_refused_is_retried_then_surfaces() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = fast_client(2);
    let err = client
        .post_json(&uri, &HashMap::new(), &json!({}))
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn test_invalid_json_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = fast_client(3);
    let err = client
        .post_json(&mock_server.uri(), &HashMap::new(), &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}
