//! Tests for the fetch module

use super::source::{lookup, wildcard_anchor_exists};
use super::*;
use crate::error::{Error, FetchTarget};
use crate::http::{HttpClient, HttpClientConfig, RetryPolicy};
use crate::types::Item;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing(rows: serde_json::Value, count: u64) -> serde_json::Value {
    json!({"data": {"appCategory": {"apps": {"results": rows, "count": count}}}})
}

fn test_fetcher(server: &MockServer) -> HttpPageFetcher {
    let config = HttpClientConfig::builder()
        .retry(RetryPolicy::new(1, Duration::from_millis(5)))
        .build();
    let source = SourceConfig {
        endpoint: format!("{}/explore-api", server.uri()),
        ..SourceConfig::default()
    };
    HttpPageFetcher::new(HttpClient::new(config).unwrap(), source)
}

// ============================================================================
// Request Body Tests
// ============================================================================

#[test]
fn test_graphql_request_body() {
    let body = SourceConfig::default().request_body(50, 25);

    assert_eq!(body["operationName"], "CategoryAppsBFFQuery");
    assert_eq!(
        body["variables"],
        json!({
            "categorySlug": "all",
            "orderBy": "POPULARITY",
            "filterBy": "",
            "offset": 50,
            "limit": 25
        })
    );
    assert!(body["query"].as_str().unwrap().contains("appCategoryWithSlug"));
}

#[test]
fn test_rest_request_body() {
    let mut source = SourceConfig::rest("https://api.example.com/list", "items", "total");
    source.offset_variable = "skip".to_string();
    source.limit_variable = "take".to_string();
    source.variables.insert("sort".to_string(), json!("name"));

    let body = source.request_body(10, 5);

    assert_eq!(body, json!({"sort": "name", "skip": 10, "take": 5}));
}

// ============================================================================
// Response Mapping Tests
// ============================================================================

#[test]
fn test_lookup_paths() {
    let value = json!({"a": {"b": [{"c": 1}, {"c": 2}]}});
    assert_eq!(lookup(&value, "a.b[1].c"), Some(&json!(2)));
    assert_eq!(lookup(&value, "$.a.b[0].c"), Some(&json!(1)));
    assert_eq!(lookup(&value, "a.x"), None);
    assert_eq!(lookup(&value, "a.b[9]"), None);
}

#[test]
fn test_read_count() {
    let source = SourceConfig::default();
    assert_eq!(source.read_count(&listing(json!([]), 57)).unwrap(), 57);

    let as_string = json!({"data": {"appCategory": {"apps": {"count": "12"}}}});
    assert_eq!(source.read_count(&as_string).unwrap(), 12);
}

#[test]
fn test_read_count_rejects_bad_shapes() {
    let source = SourceConfig::default();

    let missing = source.read_count(&json!({"data": {}})).unwrap_err();
    assert!(matches!(missing, Error::Decode { .. }));

    let negative = json!({"data": {"appCategory": {"apps": {"count": -1}}}});
    assert!(source.read_count(&negative).is_err());
}

#[test]
fn test_read_items_maps_fields() {
    let source = SourceConfig::default();
    let response = listing(
        json!([
            {"id": 1, "name": "Slack", "profileUrl": "/apps/slack", "logo": {"mainUrl": "slack.png"}},
            {"id": 2, "name": "Gmail", "profileUrl": "/apps/gmail", "logo": {"mainUrl": "gmail.png"}}
        ]),
        2,
    );

    let (items, degraded) = source.read_items(&response).unwrap();

    assert_eq!(
        items,
        vec![
            Item::new("Slack", "/apps/slack", "slack.png"),
            Item::new("Gmail", "/apps/gmail", "gmail.png"),
        ]
    );
    assert_eq!(degraded, 0);
}

#[test]
fn test_missing_fields_degrade_to_empty() {
    let source = SourceConfig::default();
    let response = listing(
        json!([
            {"name": "NoLogo", "profileUrl": "/apps/nologo"},
            {"name": "NullLogo", "profileUrl": "/apps/nulllogo", "logo": null},
            "not an object",
            {"name": "Ok", "profileUrl": "/apps/ok", "logo": {"mainUrl": "ok.png"}}
        ]),
        4,
    );

    let (items, degraded) = source.read_items(&response).unwrap();

    assert_eq!(items.len(), 4);
    assert_eq!(degraded, 3);
    assert_eq!(items[0], Item::new("NoLogo", "/apps/nologo", ""));
    assert_eq!(items[1].icon, "");
    assert_eq!(items[2], Item::default());
    assert_eq!(items[3], Item::new("Ok", "/apps/ok", "ok.png"));
}

#[test]
fn test_results_must_be_an_array() {
    let source = SourceConfig::default();

    let err = source
        .read_items(&json!({"data": {"appCategory": {"apps": {"results": {}}}}}))
        .unwrap_err();
    assert!(err.to_string().contains("not an array"));

    let err = source.read_items(&json!({"errors": []})).unwrap_err();
    assert!(err.to_string().contains("results not found"));
}

#[test]
fn test_wildcard_results_path() {
    let mut source = SourceConfig::rest("https://api.example.com", "$.groups[*].entry", "total");
    source.fields = FieldMapping {
        name: "title".to_string(),
        url: "href".to_string(),
        icon: "img".to_string(),
    };
    let response = json!({
        "total": 2,
        "groups": [
            {"entry": {"title": "A", "href": "/a", "img": "a.png"}},
            {"entry": {"title": "B", "href": "/b", "img": "b.png"}}
        ]
    });

    let (items, _) = source.read_items(&response).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[1], Item::new("B", "/b", "b.png"));
}

#[test]
fn test_wildcard_results_path_requires_container() {
    let source = SourceConfig::rest("https://api.example.com", "$.groups[*].entry", "total");

    let (items, degraded) = source.read_items(&json!({"total": 0, "groups": []})).unwrap();
    assert!(items.is_empty());
    assert_eq!(degraded, 0);

    let err = source.read_items(&json!({"errors": ["boom"]})).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("results not found"));
}

#[test]
fn test_wildcard_anchor() {
    let value = json!({"data": {"groups": []}});
    assert!(wildcard_anchor_exists(&value, "$.data.groups[*]"));
    assert!(wildcard_anchor_exists(&value, "$.data.*"));
    assert!(wildcard_anchor_exists(&value, "$[*]"));
    assert!(!wildcard_anchor_exists(&value, "$.data.apps[*].entry"));
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_validate_default_source() {
    SourceConfig::default().validate().unwrap();
}

#[test]
fn test_validate_rejects_bad_sources() {
    let bad_url = SourceConfig {
        endpoint: "not a url".to_string(),
        ..SourceConfig::default()
    };
    assert!(matches!(bad_url.validate(), Err(Error::InvalidUrl(_))));

    let bad_scheme = SourceConfig {
        endpoint: "ftp://example.com".to_string(),
        ..SourceConfig::default()
    };
    assert!(bad_scheme.validate().unwrap_err().is_config());

    let mut empty_path = SourceConfig::default();
    empty_path.fields.url = " ".to_string();
    let err = empty_path.validate().unwrap_err();
    assert!(err.to_string().contains("source.fields.url"));
}

#[test]
fn test_source_deserializes_with_preset_defaults() {
    let source: SourceConfig = serde_yaml::from_str(
        "endpoint: https://api.example.com/graphql\nresults_path: data.items\n",
    )
    .unwrap();

    assert_eq!(source.endpoint, "https://api.example.com/graphql");
    assert_eq!(source.results_path, "data.items");
    assert_eq!(source.count_path, "data.appCategory.apps.count");
    assert_eq!(source.fields, FieldMapping::default());
}

// ============================================================================
// HTTP Fetcher Tests
// ============================================================================

#[tokio::test]
async fn test_probe_count_requests_single_row() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/explore-api"))
        .and(body_partial_json(json!({"variables": {"offset": 0, "limit": 1}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            json!([{"name": "Ignored", "profileUrl": "/x", "logo": {"mainUrl": "x"}}]),
            101,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let count = test_fetcher(&server).probe_count().await.unwrap();
    assert_eq!(count, 101);
}

#[tokio::test]
async fn test_fetch_page_requests_window() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"offset": 25, "limit": 25}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(
            json!([{"name": "Trello", "profileUrl": "/apps/trello", "logo": {"mainUrl": "t.png"}}]),
            26,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let items = test_fetcher(&server).fetch_page(25, 25).await.unwrap();
    assert_eq!(items, vec![Item::new("Trello", "/apps/trello", "t.png")]);
}

#[tokio::test]
async fn test_fetch_page_failure_carries_offset() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    let err = test_fetcher(&server).fetch_page(75, 25).await.unwrap_err();

    match err {
        Error::Fetch { target, source } => {
            assert_eq!(target, FetchTarget::Page { offset: 75 });
            assert!(matches!(*source, Error::HttpStatus { status: 502, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_probe_failure_is_tagged_stats() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let err = test_fetcher(&server).probe_count().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Fetch {
            target: FetchTarget::Stats,
            ..
        }
    ));
}
