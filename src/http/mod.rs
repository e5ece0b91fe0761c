//! HTTP module
//!
//! Provides the query transport and the HTTP client behind it.
//!
//! # Features
//!
//! - **Query Transport**: `QueryTransport` trait with a CREST REST implementation
//! - **Automatic Retries**: Transient failures retried with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{QueryTransport, RestTransport};

#[cfg(test)]
mod tests;
