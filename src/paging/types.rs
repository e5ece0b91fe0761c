//! Paging types
//!
//! Sort keys, outgoing query parameters and the parsed query response.

use crate::types::{PagingMode, SortDirection, TotalCountPolicy};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Query parameter names understood by CREST endpoints
pub mod param {
    pub const PAGE_SIZE: &str = "_pageSize";
    pub const PAGED_RESULTS_OFFSET: &str = "_pagedResultsOffset";
    pub const PAGED_RESULTS_COOKIE: &str = "_pagedResultsCookie";
    pub const SORT_KEYS: &str = "_sortKeys";
    pub const TOTAL_PAGED_RESULTS_POLICY: &str = "_totalPagedResultsPolicy";
    pub const QUERY_FILTER: &str = "_queryFilter";
}

// ============================================================================
// Sort Keys
// ============================================================================

/// A single sort key
///
/// Encodes as `field` when ascending and `-field` when descending, so an
/// ordered list of encoded strings fully describes a multi-key sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    /// Create a new sort key
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Ascending sort on `field`
    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    /// Descending sort on `field`
    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Parse the encoded form (`-field` or `field`)
    pub fn parse(encoded: &str) -> Self {
        match encoded.strip_prefix('-') {
            Some(field) => Self::descending(field),
            None => Self::ascending(encoded.strip_prefix('+').unwrap_or(encoded)),
        }
    }

    /// Encoded form sent in `_sortKeys`
    pub fn encode(&self) -> String {
        match self.direction {
            SortDirection::Ascending => self.field.clone(),
            SortDirection::Descending => format!("-{}", self.field),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Outgoing parameter set for a "fetch page" request
///
/// Absent values are never stored: a missing key means "let the server
/// default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    pairs: Vec<(String, String)>,
}

impl QueryParameters {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Add a parameter only if it has a value
    pub fn insert_opt<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value.to_string());
        }
    }

    /// Get a parameter value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if a parameter is present
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over parameters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render as a single URL-encoded query string
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

impl fmt::Display for QueryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

// ============================================================================
// Query Response
// ============================================================================

/// Parsed response of a CREST query request
///
/// Fields are read leniently: a malformed value reads as absent, so one bad
/// field never costs the caller its records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Records in server order
    #[serde(default, deserialize_with = "lenient_records")]
    pub result: Vec<Value>,

    /// Continuation cookie for the next page
    #[serde(default, deserialize_with = "lenient_string")]
    pub paged_results_cookie: Option<String>,

    /// Total result count, kept raw so malformed values degrade to unknown
    #[serde(default)]
    pub total_paged_results: Option<Value>,
}

fn lenient_records<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(records) => Ok(records),
        _ => Ok(Vec::new()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl QueryResponse {
    /// Create a response carrying only records
    pub fn with_records(result: Vec<Value>) -> Self {
        Self {
            result,
            ..Default::default()
        }
    }

    /// Set the continuation cookie
    #[must_use]
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.paged_results_cookie = Some(cookie.into());
        self
    }

    /// Set the total result count
    #[must_use]
    pub fn total(mut self, total: impl Into<Value>) -> Self {
        self.total_paged_results = Some(total.into());
        self
    }

    /// Usable total record count: a non-negative whole number, else unknown
    pub fn total_records(&self) -> Option<u64> {
        match self.total_paged_results.as_ref()? {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            }),
            _ => None,
        }
    }
}

// ============================================================================
// Defaults and Requests
// ============================================================================

/// Per-instance paging configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingDefaults {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default)]
    pub paging_mode: PagingMode,

    #[serde(default)]
    pub total_count_policy: TotalCountPolicy,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PagingDefaults {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            paging_mode: PagingMode::Offset,
            total_count_policy: TotalCountPolicy::None,
        }
    }
}

/// A request that has been set up and is waiting for its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    /// Monotonic request number; only the latest may be applied
    pub sequence: u64,
    pub parameters: QueryParameters,
}
