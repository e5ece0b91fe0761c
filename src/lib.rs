// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # crest-pager
//!
//! Paging controller for CREST-style query endpoints.
//!
//! A [`PagedQueryState`] tracks where a client is inside a paged result set
//! and turns navigation requests (first, next, previous, last, page N) into
//! query parameters. A [`PagedCollection`] drives that state against a
//! [`QueryTransport`], discards stale responses and reports failures to a
//! message sink.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crest_pager::{App, AppConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut config = AppConfig::default();
//!     config.service_invoker.base_url = Some("https://idm.example.com/openidm".into());
//!
//!     let app = App::assemble(config)?;
//!     let users = app.collection("managed/user");
//!     users.set_page_size(50);
//!
//!     let mut page = users.first_page().await?;
//!     while users.has_next() {
//!         page = users.next_page().await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    PagedCollection                       │
//! │  first_page / next_page / previous_page / last_page      │
//! └──────────────────────────────────────────────────────────┘
//!            │                    │                  │
//! ┌──────────┴───────┬────────────┴─────┬────────────┴──────┐
//! │ PagedQueryState  │  QueryTransport  │   MessageSink     │
//! ├──────────────────┼──────────────────┼───────────────────┤
//! │ Offset / Cookie  │ RestTransport    │ MessageHub        │
//! │ Sort keys        │ Retry, backoff   │ Broadcast         │
//! │ Total policy     │ Rate limit       │ i18n catalog      │
//! └──────────────────┴──────────────────┴───────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document accessors and config fields before 1.0

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Paging state and query parameters
pub mod paging;

/// HTTP client, rate limiting and query transport
pub mod http;

/// Notification messages
pub mod messages;

/// Paged collections driven over a transport
pub mod collection;

/// Typed application configuration
pub mod config;

/// YAML loader for application configuration
pub mod loader;

/// Application assembly
pub mod app;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use app::App;
pub use collection::PagedCollection;
pub use config::AppConfig;
pub use http::{QueryTransport, RestTransport};
pub use loader::{load_app_config, load_app_config_from_str};
pub use messages::{Message, MessageHub, MessageSink};
pub use paging::{PagedQueryState, QueryParameters, QueryResponse, SortKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
