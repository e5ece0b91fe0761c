//! Application assembly
//!
//! Builds the shared services from a typed `AppConfig` and hands out paged
//! collections wired to them.

use crate::collection::PagedCollection;
use crate::config::AppConfig;
use crate::error::Result;
use crate::http::{HttpClient, RestTransport};
use crate::loader::validate_app_config;
use crate::messages::MessageHub;
use std::sync::Arc;
use tracing::info;

/// Assembled application services
#[derive(Debug)]
pub struct App {
    config: AppConfig,
    client: Arc<HttpClient>,
    messages: Arc<MessageHub>,
}

impl App {
    /// Validate `config` and build the HTTP client and message hub
    pub fn assemble(config: AppConfig) -> Result<Self> {
        validate_app_config(&config)?;

        let client = Arc::new(HttpClient::with_config(
            config.service_invoker.to_http_config(),
        )?);
        let messages =
            Arc::new(MessageHub::default().with_catalog(config.messages.catalog()));

        info!(
            "Assembled app: base_url={}, page_size={}, paging_mode={}",
            config
                .service_invoker
                .base_url
                .as_deref()
                .unwrap_or("<none>"),
            config.collection.page_size,
            config.collection.paging_mode
        );

        Ok(Self {
            config,
            client,
            messages,
        })
    }

    /// New collection over `resource` with fresh paging defaults
    pub fn collection(&self, resource: impl Into<String>) -> PagedCollection {
        let transport = Arc::new(RestTransport::new(self.client.clone(), resource));
        PagedCollection::with_defaults(transport, self.messages.clone(), self.config.collection)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    pub fn messages(&self) -> &Arc<MessageHub> {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PagingMode, Severity};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(uri: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.service_invoker.base_url = Some(uri.to_string());
        config.service_invoker.rate_limit = None;
        config.service_invoker.max_retries = 0;
        config
    }

    #[test]
    fn test_assemble_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.service_invoker.base_url = Some("mailto:someone".to_string());
        assert!(App::assemble(config).is_err());
    }

    #[test]
    fn test_collections_do_not_share_state() {
        let app = App::assemble(AppConfig::default()).unwrap();
        let users = app.collection("managed/user");
        let roles = app.collection("managed/role");

        users.set_page_size(50);
        users.set_paging_mode("cookie");

        assert_eq!(roles.snapshot().page_size(), 10);
        assert_eq!(roles.snapshot().paging_mode(), PagingMode::Offset);
        assert_eq!(app.config().collection.page_size, 10);
    }

    #[tokio::test]
    async fn test_collection_uses_configured_client() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/openidm/managed/user"))
            .and(header("X-Requested-With", "XMLHttpRequest"))
            .and(query_param("_pageSize", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": [{"_id": "bjensen"}],
                "totalPagedResults": 1
            })))
            .mount(&mock_server)
            .await;

        let mut config = config_for(&format!("{}/openidm", mock_server.uri()));
        config
            .service_invoker
            .default_headers
            .insert("X-Requested-With".to_string(), "XMLHttpRequest".to_string());
        let app = App::assemble(config).unwrap();

        let users = app.collection("managed/user");
        let records = users.first_page().await.unwrap().unwrap();
        assert_eq!(records[0]["_id"], "bjensen");
        assert!(!users.has_next());
    }

    #[tokio::test]
    async fn test_failure_reaches_message_hub() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/managed/user"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "code": 403,
                "reason": "Forbidden"
            })))
            .mount(&mock_server)
            .await;

        let app = App::assemble(config_for(&mock_server.uri())).unwrap();
        let mut messages = app.messages().subscribe();

        let users = app.collection("managed/user");
        assert!(users.first_page().await.is_err());

        let message = messages.try_recv().unwrap();
        assert_eq!(message.severity, Severity::Danger);
        assert_eq!(message.response.unwrap()["body"]["reason"], "Forbidden");
    }
}
