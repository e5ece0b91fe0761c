//! Tests for the HTTP module

use super::*;
use crate::error::Error;
use crate::paging::{PagedQueryState, QueryParameters};
use crate::types::{BackoffType, SortDirection};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_config(uri: &str) -> HttpClientConfig {
    HttpClientConfig {
        base_url: Some(uri.to_string()),
        max_retries: 2,
        backoff_type: BackoffType::Constant,
        initial_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_secs(1),
        rate_limit: None,
        ..HttpClientConfig::default()
    }
}

fn test_client(uri: &str) -> HttpClient {
    HttpClient::with_config(client_config(uri)).unwrap()
}

fn page_size(size: &str) -> QueryParameters {
    let mut params = QueryParameters::new();
    params.insert("_pageSize", size);
    params
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("crest-pager/"));

    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());
}

#[test]
fn test_invalid_default_header_is_config_error() {
    let mut config = client_config("https://idm.example.com");
    config
        .default_headers
        .insert("Bad Header".to_string(), "x".to_string());

    let err = HttpClient::with_config(config).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue { .. }));
    assert!(err.to_string().contains("Bad Header"));
}

#[test]
fn test_query_url() {
    let client = test_client("https://idm.example.com/openidm/");
    assert_eq!(
        client.query_url("/managed/user", &page_size("10")),
        "https://idm.example.com/openidm/managed/user?_pageSize=10"
    );
    assert_eq!(
        client.query_url("managed/user", &QueryParameters::new()),
        "https://idm.example.com/openidm/managed/user"
    );
    assert_eq!(
        client.query_url("endpoint/report?_fields=name", &page_size("5")),
        "https://idm.example.com/openidm/endpoint/report?_fields=name&_pageSize=5"
    );

    let mut config = client_config("unused");
    config.base_url = None;
    let client = HttpClient::with_config(config).unwrap();
    assert_eq!(
        client.query_url("https://other.example.com/x", &page_size("1")),
        "https://other.example.com/x?_pageSize=1"
    );
}

#[test]
fn test_backoff_delay() {
    let mut config = client_config("https://idm.example.com");
    config.backoff_type = BackoffType::Exponential;
    config.initial_backoff = Duration::from_millis(100);
    config.max_backoff = Duration::from_millis(500);
    let client = HttpClient::with_config(config.clone()).unwrap();

    assert_eq!(client.backoff_delay(0), Duration::from_millis(100));
    assert_eq!(client.backoff_delay(1), Duration::from_millis(200));
    assert_eq!(client.backoff_delay(2), Duration::from_millis(400));
    assert_eq!(client.backoff_delay(10), Duration::from_millis(500));
    assert_eq!(client.backoff_delay(u32::MAX), Duration::from_millis(500));

    config.backoff_type = BackoffType::Linear;
    config.max_backoff = Duration::from_secs(10);
    let client = HttpClient::with_config(config).unwrap();
    assert_eq!(client.backoff_delay(2), Duration::from_millis(300));
}

// ============================================================================
// Query Requests
// ============================================================================

#[tokio::test]
async fn test_get_query_sends_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managed/user"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(query_param("_pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"_id": "1"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = client_config(&mock_server.uri());
    config
        .default_headers
        .insert("X-Requested-With".to_string(), "XMLHttpRequest".to_string());
    let client = HttpClient::with_config(config).unwrap();

    let response = client
        .get_query("/managed/user", &page_size("10"))
        .await
        .unwrap();
    assert_eq!(response.result, vec![json!({"_id": "1"})]);
}

#[tokio::test]
async fn test_get_query_client_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managed/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let err = client
        .get_query("/managed/missing", &QueryParameters::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_get_query_retries_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managed/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/managed/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"_id": "ok"}]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let response = client
        .get_query("/managed/flaky", &QueryParameters::new())
        .await
        .unwrap();
    assert_eq!(response.result[0]["_id"], "ok");
}

#[tokio::test]
async fn test_get_query_gives_up_after_max_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managed/down"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Unavailable"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let err = client
        .get_query("/managed/down", &QueryParameters::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("Unavailable"));
}

#[tokio::test]
async fn test_get_query_retries_after_throttling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managed/user"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/managed/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": []})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let response = client
        .get_query("/managed/user", &QueryParameters::new())
        .await
        .unwrap();
    assert!(response.result.is_empty());
}

#[tokio::test]
async fn test_get_query_non_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managed/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let err = client
        .get_query("/managed/user", &QueryParameters::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_get_query_keeps_records_despite_malformed_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managed/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"_id": "1"}, {"_id": "2"}],
            "resultCount": -1,
            "remainingPagedResults": "unknown",
            "pagedResultsCookie": 42,
            "totalPagedResults": "many"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server.uri());
    let response = client
        .get_query("/managed/user", &QueryParameters::new())
        .await
        .unwrap();
    assert_eq!(response.result.len(), 2);
    assert_eq!(response.paged_results_cookie, None);
    assert_eq!(response.total_records(), None);
}

// ============================================================================
// Rest Transport
// ============================================================================

#[tokio::test]
async fn test_rest_transport_sends_query_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managed/user"))
        .and(query_param("_pageSize", "10"))
        .and(query_param("_pagedResultsOffset", "20"))
        .and(query_param("_sortKeys", "-userName"))
        .and(query_param("_queryFilter", "userName sw \"a\""))
        .and(query_param_is_missing("order"))
        .and(query_param_is_missing("_totalPagedResultsPolicy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"_id": "1"}, {"_id": "2"}],
            "resultCount": 2,
            "totalPagedResults": 22
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = RestTransport::new(Arc::new(test_client(&mock_server.uri())), "managed/user");

    let mut state = PagedQueryState::new();
    state
        .set_sorting("userName", SortDirection::Descending)
        .set_query_filter(Some("userName sw \"a\"".to_string()));
    let params = state.get_page(2);

    let response = transport.execute(&params).await.unwrap();
    assert_eq!(response.result.len(), 2);
    assert_eq!(response.total_records(), Some(22));
    assert_eq!(transport.resource(), "managed/user");
}

#[tokio::test]
async fn test_rest_transport_rejects_non_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managed/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&mock_server)
        .await;

    let transport = RestTransport::new(Arc::new(test_client(&mock_server.uri())), "managed/user");
    let err = transport
        .execute(&QueryParameters::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("an array"));
}

#[tokio::test]
async fn test_rest_transport_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managed/user"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "reason": "Bad Request",
            "message": "Invalid filter"
        })))
        .mount(&mock_server)
        .await;

    let transport = RestTransport::new(Arc::new(test_client(&mock_server.uri())), "managed/user");
    let err = transport
        .execute(&QueryParameters::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("Invalid filter"));
}
