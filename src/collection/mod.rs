//! Collection module
//!
//! `PagedCollection` composes a `PagedQueryState` with a `QueryTransport`
//! and a `MessageSink`: navigation sets up the request synchronously,
//! dispatches it, and applies the response only if no newer request was
//! issued in the meantime.

mod paged;

pub use paged::PagedCollection;
