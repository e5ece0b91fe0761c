//! Query transport
//!
//! The capability a paged collection uses to execute one page request.

use super::client::HttpClient;
use crate::error::Result;
use crate::paging::{QueryParameters, QueryResponse};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Executes a page request against a query endpoint
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Send `parameters` and return the parsed response
    async fn execute(&self, parameters: &QueryParameters) -> Result<QueryResponse>;
}

/// CREST query transport over HTTP GET
///
/// Parameters go out as the URL query string, never as form data.
#[derive(Debug, Clone)]
pub struct RestTransport {
    client: Arc<HttpClient>,
    resource: String,
}

impl RestTransport {
    /// Create a transport for `resource`, relative to the client's base URL
    pub fn new(client: Arc<HttpClient>, resource: impl Into<String>) -> Self {
        Self {
            client,
            resource: resource.into(),
        }
    }

    /// Resource path this transport queries
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

#[async_trait]
impl QueryTransport for RestTransport {
    async fn execute(&self, parameters: &QueryParameters) -> Result<QueryResponse> {
        debug!("Querying {} with {}", self.resource, parameters);
        self.client.get_query(&self.resource, parameters).await
    }
}
