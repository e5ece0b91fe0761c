//! Paging module
//!
//! Supports: Offset and Cookie paging against CREST query endpoints
//!
//! # Overview
//!
//! `PagedQueryState` is a pure state machine. Navigation calls mutate the
//! state and return the `QueryParameters` for the next request; responses are
//! fed back through `apply_response`. Nothing here performs I/O or fails.

mod state;
mod types;

pub use state::PagedQueryState;
pub use types::{
    param, PagingDefaults, PendingQuery, QueryParameters, QueryResponse, SortKey,
    DEFAULT_PAGE_SIZE,
};
