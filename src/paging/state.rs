//! Paged query state machine
//!
//! Holds paging configuration and derives the next outgoing parameter set and
//! the navigation affordances. Every operation is infallible: unknown
//! configuration normalizes to a default, and navigation that is undefined
//! for the current state falls back to the first page.

use super::types::{
    param, PagingDefaults, PendingQuery, QueryParameters, QueryResponse, SortKey,
    DEFAULT_PAGE_SIZE,
};
use crate::types::{PagingMode, SortDirection, TotalCountPolicy};
use serde_json::Value;
use tracing::debug;

/// Paging state for one query session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedQueryState {
    paging_mode: PagingMode,
    total_count_policy: TotalCountPolicy,
    page_size: u32,
    current_page: u32,
    /// `None` is absent, distinct from `Some(0)`
    paged_results_offset: Option<u64>,
    paged_results_cookie: Option<String>,
    total_records: Option<u64>,
    total_pages: Option<u64>,
    sort_keys: Vec<SortKey>,
    query_filter: Option<String>,
    sequence: u64,
}

impl Default for PagedQueryState {
    fn default() -> Self {
        Self::with_defaults(PagingDefaults::default())
    }
}

impl PagedQueryState {
    /// Create a state with stock defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state from per-instance defaults
    pub fn with_defaults(defaults: PagingDefaults) -> Self {
        Self {
            paging_mode: defaults.paging_mode,
            total_count_policy: defaults.total_count_policy,
            page_size: normalize_page_size(defaults.page_size),
            current_page: 0,
            paged_results_offset: Some(0),
            paged_results_cookie: None,
            total_records: None,
            total_pages: None,
            sort_keys: Vec::new(),
            query_filter: None,
            sequence: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn paging_mode(&self) -> PagingMode {
        self.paging_mode
    }

    pub fn total_count_policy(&self) -> TotalCountPolicy {
        self.total_count_policy
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn paged_results_offset(&self) -> Option<u64> {
        self.paged_results_offset
    }

    pub fn paged_results_cookie(&self) -> Option<&str> {
        self.paged_results_cookie.as_deref()
    }

    pub fn total_records(&self) -> Option<u64> {
        self.total_records
    }

    pub fn total_pages(&self) -> Option<u64> {
        self.total_pages
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    pub fn query_filter(&self) -> Option<&str> {
        self.query_filter.as_deref()
    }

    /// Sequence number of the most recently issued request
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Set the paging mode from a raw value; unknown values become `Offset`
    pub fn set_paging_mode(&mut self, mode: &str) -> &mut Self {
        self.paging_mode = PagingMode::normalize(mode);
        self
    }

    /// Set the paging mode
    pub fn with_paging_mode(&mut self, mode: PagingMode) -> &mut Self {
        self.paging_mode = mode;
        self
    }

    /// Set the total count policy from a raw value; unknown values become `None`
    pub fn set_total_count_policy(&mut self, policy: &str) -> &mut Self {
        self.total_count_policy = TotalCountPolicy::normalize(policy);
        self
    }

    /// Set the total count policy
    pub fn with_total_count_policy(&mut self, policy: TotalCountPolicy) -> &mut Self {
        self.total_count_policy = policy;
        self
    }

    /// Set the page size; zero falls back to the default
    pub fn set_page_size(&mut self, page_size: u32) -> &mut Self {
        self.page_size = normalize_page_size(page_size);
        self.recompute_total_pages();
        self
    }

    /// Sort by a single key, replacing any existing sort
    pub fn set_sorting(&mut self, field: impl Into<String>, direction: SortDirection) -> &mut Self {
        self.sort_keys = vec![SortKey::new(field, direction)];
        self
    }

    /// Append a secondary sort key
    pub fn add_sort_key(&mut self, key: SortKey) -> &mut Self {
        self.sort_keys.push(key);
        self
    }

    pub fn clear_sorting(&mut self) -> &mut Self {
        self.sort_keys.clear();
        self
    }

    /// Set or clear the query filter expression
    pub fn set_query_filter(&mut self, filter: Option<String>) -> &mut Self {
        self.query_filter = filter;
        self
    }

    // ========================================================================
    // Affordances
    // ========================================================================

    /// Only offset paging can go backwards
    pub fn has_previous(&self) -> bool {
        self.paging_mode == PagingMode::Offset && self.current_page >= 1
    }

    /// Whether a further page may exist
    ///
    /// With offset paging and no known total, more data is assumed.
    pub fn has_next(&self) -> bool {
        match self.paging_mode {
            PagingMode::Cookie => self.holds_cookie(),
            PagingMode::Offset => match self.total_records {
                None => true,
                Some(total) => total >= (u64::from(self.current_page) + 1) * self.page_size_u64(),
            },
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Reset to the first page
    pub fn get_first_page(&mut self) -> QueryParameters {
        self.paged_results_cookie = None;
        self.paged_results_offset = Some(0);
        self.current_page = 0;
        debug!("Navigating to first page");
        self.build_query_parameters()
    }

    /// Jump to the last page; needs offset paging and a known, positive total
    pub fn get_last_page(&mut self) -> QueryParameters {
        match self.total_records {
            Some(total) if self.paging_mode == PagingMode::Offset && total > 0 => {
                let last = (total - 1) / self.page_size_u64();
                self.paged_results_cookie = None;
                self.current_page = u32::try_from(last).unwrap_or(u32::MAX);
                self.paged_results_offset = Some(last * self.page_size_u64());
                debug!("Navigating to last page {}", self.current_page);
                self.build_query_parameters()
            }
            _ => {
                debug!("Last page undefined without a total, falling back to first page");
                self.get_first_page()
            }
        }
    }

    /// Advance one page
    pub fn get_next_page(&mut self) -> QueryParameters {
        match self.paging_mode {
            PagingMode::Cookie => {
                if !self.holds_cookie() {
                    debug!("No paged results cookie held, falling back to first page");
                    return self.get_first_page();
                }
                self.paged_results_offset = None;
                debug!("Navigating to next page by cookie");
            }
            PagingMode::Offset => {
                self.paged_results_cookie = None;
                self.current_page = self.current_page.saturating_add(1);
                self.paged_results_offset =
                    Some(u64::from(self.current_page) * self.page_size_u64());
                debug!("Navigating to next page {}", self.current_page);
            }
        }
        self.build_query_parameters()
    }

    /// Go back one page (offset paging only)
    pub fn get_previous_page(&mut self) -> QueryParameters {
        if !self.has_previous() {
            return self.get_first_page();
        }
        self.paged_results_cookie = None;
        self.current_page -= 1;
        self.paged_results_offset = Some(u64::from(self.current_page) * self.page_size_u64());
        debug!("Navigating to previous page {}", self.current_page);
        self.build_query_parameters()
    }

    /// Jump to page `page` (zero based)
    ///
    /// Cookie paging cannot honor an arbitrary jump; the numeric fields are
    /// still set.
    pub fn get_page(&mut self, page: u32) -> QueryParameters {
        if self.paging_mode == PagingMode::Offset {
            self.paged_results_cookie = None;
        }
        self.current_page = page;
        self.paged_results_offset = Some(self.page_size_u64() * u64::from(page));
        debug!("Navigating to page {}", page);
        self.build_query_parameters()
    }

    // ========================================================================
    // Requests and Responses
    // ========================================================================

    /// Build the outgoing parameter set from the current state
    pub fn build_query_parameters(&self) -> QueryParameters {
        let mut params = QueryParameters::new();
        params.insert(param::PAGE_SIZE, self.page_size.to_string());
        params.insert_opt(
            param::PAGED_RESULTS_OFFSET,
            self.paged_results_offset.filter(|offset| *offset != 0),
        );
        if !self.sort_keys.is_empty() {
            let encoded: Vec<String> = self.sort_keys.iter().map(SortKey::encode).collect();
            params.insert(param::SORT_KEYS, encoded.join(","));
        }
        if self.total_count_policy != TotalCountPolicy::None {
            params.insert(
                param::TOTAL_PAGED_RESULTS_POLICY,
                self.total_count_policy.as_str(),
            );
        }
        params.insert_opt(param::QUERY_FILTER, self.query_filter.as_deref());
        params.insert_opt(param::PAGED_RESULTS_COOKIE, self.paged_results_cookie.as_deref());
        params
    }

    /// Mark a request as issued, superseding any request still in flight
    pub fn begin_request(&mut self, parameters: QueryParameters) -> PendingQuery {
        self.sequence += 1;
        PendingQuery {
            sequence: self.sequence,
            parameters,
        }
    }

    /// Apply a response, returning its records in server order
    pub fn apply_response(&mut self, response: QueryResponse) -> Vec<Value> {
        self.paged_results_cookie = match self.paging_mode {
            PagingMode::Cookie => response.paged_results_cookie.clone(),
            PagingMode::Offset => None,
        };
        self.total_records = response.total_records();
        self.recompute_total_pages();
        debug!(
            "Applied response: {} records, total {:?}, cookie held: {}",
            response.result.len(),
            self.total_records,
            self.paged_results_cookie.is_some()
        );
        response.result
    }

    /// Apply a response to request `sequence`; stale responses are discarded
    pub fn apply_response_for(
        &mut self,
        sequence: u64,
        response: QueryResponse,
    ) -> Option<Vec<Value>> {
        if sequence != self.sequence {
            debug!(
                "Discarding stale response for request {} (latest is {})",
                sequence, self.sequence
            );
            return None;
        }
        Some(self.apply_response(response))
    }

    fn holds_cookie(&self) -> bool {
        self.paged_results_cookie
            .as_deref()
            .is_some_and(|cookie| !cookie.is_empty())
    }

    fn recompute_total_pages(&mut self) {
        self.total_pages = self
            .total_records
            .map(|total| total.div_ceil(self.page_size_u64()));
    }

    fn page_size_u64(&self) -> u64 {
        u64::from(self.page_size)
    }
}

fn normalize_page_size(page_size: u32) -> u32 {
    if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    }
}
