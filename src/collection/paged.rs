//! Paged collection implementation

use crate::error::Result;
use crate::http::QueryTransport;
use crate::messages::{Message, MessageSink};
use crate::paging::{PagedQueryState, PagingDefaults, QueryParameters, SortKey};
use crate::types::SortDirection;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct Inner {
    state: PagedQueryState,
    records: Vec<Value>,
}

/// A REST-backed collection paged through a `QueryTransport`
///
/// Navigation methods return `Ok(Some(records))` when the response was
/// applied and `Ok(None)` when it arrived after a newer request and was
/// discarded.
pub struct PagedCollection {
    // Never held across an await
    inner: Mutex<Inner>,
    transport: Arc<dyn QueryTransport>,
    sink: Arc<dyn MessageSink>,
}

impl PagedCollection {
    /// Create a collection with stock paging defaults
    pub fn new(transport: Arc<dyn QueryTransport>, sink: Arc<dyn MessageSink>) -> Self {
        Self::with_defaults(transport, sink, PagingDefaults::default())
    }

    /// Create a collection with its own paging defaults
    pub fn with_defaults(
        transport: Arc<dyn QueryTransport>,
        sink: Arc<dyn MessageSink>,
        defaults: PagingDefaults,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: PagedQueryState::with_defaults(defaults),
                records: Vec::new(),
            }),
            transport,
            sink,
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Re-fetch with the current parameters
    pub async fn fetch(&self) -> Result<Option<Vec<Value>>> {
        self.run(|state| state.build_query_parameters()).await
    }

    pub async fn first_page(&self) -> Result<Option<Vec<Value>>> {
        self.run(PagedQueryState::get_first_page).await
    }

    pub async fn next_page(&self) -> Result<Option<Vec<Value>>> {
        self.run(PagedQueryState::get_next_page).await
    }

    pub async fn previous_page(&self) -> Result<Option<Vec<Value>>> {
        self.run(PagedQueryState::get_previous_page).await
    }

    pub async fn last_page(&self) -> Result<Option<Vec<Value>>> {
        self.run(PagedQueryState::get_last_page).await
    }

    /// Jump to page `page` (zero based)
    pub async fn page(&self, page: u32) -> Result<Option<Vec<Value>>> {
        self.run(move |state| state.get_page(page)).await
    }

    async fn run<F>(&self, navigate: F) -> Result<Option<Vec<Value>>>
    where
        F: FnOnce(&mut PagedQueryState) -> QueryParameters + Send,
    {
        let pending = {
            let mut inner = self.lock();
            let parameters = navigate(&mut inner.state);
            inner.state.begin_request(parameters)
        };
        debug!(
            "Dispatching request {}: {}",
            pending.sequence, pending.parameters
        );

        match self.transport.execute(&pending.parameters).await {
            Ok(response) => {
                let mut inner = self.lock();
                let applied = inner.state.apply_response_for(pending.sequence, response);
                if let Some(records) = &applied {
                    inner.records.clone_from(records);
                }
                Ok(applied)
            }
            Err(e) => {
                warn!("Request {} failed: {}", pending.sequence, e);
                self.sink.add_message(Message::danger_from_error(&e));
                Err(e)
            }
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn set_paging_mode(&self, mode: &str) {
        self.lock().state.set_paging_mode(mode);
    }

    pub fn set_total_count_policy(&self, policy: &str) {
        self.lock().state.set_total_count_policy(policy);
    }

    pub fn set_page_size(&self, page_size: u32) {
        self.lock().state.set_page_size(page_size);
    }

    pub fn set_sorting(&self, field: impl Into<String>, direction: SortDirection) {
        self.lock().state.set_sorting(field, direction);
    }

    pub fn add_sort_key(&self, key: SortKey) {
        self.lock().state.add_sort_key(key);
    }

    pub fn set_query_filter(&self, filter: Option<String>) {
        self.lock().state.set_query_filter(filter);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Records of the last applied page
    pub fn records(&self) -> Vec<Value> {
        self.lock().records.clone()
    }

    pub fn has_next(&self) -> bool {
        self.lock().state.has_next()
    }

    pub fn has_previous(&self) -> bool {
        self.lock().state.has_previous()
    }

    /// Copy of the current paging state
    pub fn snapshot(&self) -> PagedQueryState {
        self.lock().state.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for PagedCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedCollection")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}
