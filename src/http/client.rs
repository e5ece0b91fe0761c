//! HTTP client for CREST query requests
//!
//! One GET per page: the resource path joined to the base URL, the encoded
//! `QueryParameters` as the query string, and a JSON object back. Failures
//! that `Error::is_retryable` accepts are retried with backoff.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::paging::{QueryParameters, QueryResponse};
use crate::types::BackoffType;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL that resource paths are joined to
    pub base_url: Option<String>,
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_backoff: Duration,
    /// Upper bound for any single retry delay
    pub max_backoff: Duration,
    pub backoff_type: BackoffType,
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers sent with every query
    pub default_headers: HashMap<String, String>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: HashMap::new(),
            user_agent: format!("crest-pager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Query client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Build a client; invalid default header names or values are config errors
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(header_map(&config.default_headers)?)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Query `resource` with `parameters` and decode the page
    pub async fn get_query(
        &self,
        resource: &str,
        parameters: &QueryParameters,
    ) -> Result<QueryResponse> {
        let url = self.query_url(resource, parameters);
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            match self.send(&url).await {
                Ok(body) => return decode_page(resource, body),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    let delay = self.retry_delay(&e, attempt);
                    warn!(
                        "Query {} failed ({}), attempt {}/{}, retrying in {:?}",
                        resource,
                        e,
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One attempt: wait for the limiter, send, classify the outcome
    async fn send(&self, url: &str) -> Result<Value> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited {
                retry_after_seconds: retry_after(&response),
            });
        }
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("GET {} -> {}", url, status.as_u16());
        response
            .json()
            .await
            .map_err(|e| Error::decode(format!("Response from '{url}' is not JSON: {e}")))
    }

    /// Resource URL with the encoded parameters appended
    pub(crate) fn query_url(&self, resource: &str, parameters: &QueryParameters) -> String {
        let mut url = match &self.config.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                resource.trim_start_matches('/')
            ),
            None => resource.to_string(),
        };

        if !parameters.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&parameters.to_query_string());
        }
        url
    }

    /// Delay before retry number `attempt + 1`
    pub(crate) fn backoff_delay(&self, attempt: u32) -> Duration {
        let initial = self.config.initial_backoff;
        let delay = match self.config.backoff_type {
            BackoffType::Constant => initial,
            BackoffType::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.min(self.config.max_backoff)
    }

    /// Backoff delay, stretched to the server's Retry-After when throttled
    fn retry_delay(&self, error: &Error, attempt: u32) -> Duration {
        let backoff = self.backoff_delay(attempt);
        match error {
            Error::RateLimited {
                retry_after_seconds,
            } => backoff
                .max(Duration::from_secs(*retry_after_seconds))
                .min(self.config.max_backoff),
            _ => backoff,
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            Error::invalid_value("service_invoker.default_headers", format!("'{name}': {e}"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            Error::invalid_value("service_invoker.default_headers", format!("'{name}': {e}"))
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Seconds from a numeric Retry-After header, 0 when absent or a date
fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// A query body must be a JSON object; its fields are read leniently
fn decode_page(resource: &str, body: Value) -> Result<QueryResponse> {
    if !body.is_object() {
        return Err(Error::decode(format!(
            "Expected a JSON object from '{resource}', got {}",
            json_kind(&body)
        )));
    }
    serde_json::from_value(body)
        .map_err(|e| Error::decode(format!("Invalid query response from '{resource}': {e}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
