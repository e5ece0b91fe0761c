//! Common types used throughout crest-pager
//!
//! Paging enums normalize unknown input to a safe default instead of
//! rejecting it, both when set programmatically and when deserialized.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Paging Mode
// ============================================================================

/// How page navigation is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PagingMode {
    /// Numeric `_pagedResultsOffset`
    #[default]
    Offset,
    /// Opaque forward-only `_pagedResultsCookie`
    Cookie,
}

impl PagingMode {
    /// Normalize a raw value. Only `"offset"` and `"cookie"` are recognized,
    /// everything else becomes `Offset`.
    pub fn normalize(value: &str) -> Self {
        match value {
            "cookie" => Self::Cookie,
            _ => Self::Offset,
        }
    }

    /// Wire/config literal
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offset => "offset",
            Self::Cookie => "cookie",
        }
    }
}

impl From<String> for PagingMode {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<PagingMode> for String {
    fn from(mode: PagingMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for PagingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Total Count Policy
// ============================================================================

/// How eagerly the server should compute `totalPagedResults`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TotalCountPolicy {
    /// No total requested
    #[default]
    None,
    /// Server may return an estimate
    Estimate,
    /// Server must return an exact count
    Exact,
}

impl TotalCountPolicy {
    /// Normalize a raw value. Only `"NONE"`, `"ESTIMATE"` and `"EXACT"` are
    /// recognized, everything else becomes `None`.
    pub fn normalize(value: &str) -> Self {
        match value {
            "ESTIMATE" => Self::Estimate,
            "EXACT" => Self::Exact,
            _ => Self::None,
        }
    }

    /// Wire literal sent as `_totalPagedResultsPolicy`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Estimate => "ESTIMATE",
            Self::Exact => "EXACT",
        }
    }
}

impl From<String> for TotalCountPolicy {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<TotalCountPolicy> for String {
    fn from(policy: TotalCountPolicy) -> Self {
        policy.as_str().to_string()
    }
}

impl fmt::Display for TotalCountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Sort Direction
// ============================================================================

/// Sort direction for a single sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

// ============================================================================
// Severity
// ============================================================================

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

// ============================================================================
// Log Level
// ============================================================================

/// Log level for the application logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}
