//! Message types

use crate::error::Error;
use crate::types::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A user-facing notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub severity: Severity,
    /// Display text, already translated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Raw failure payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message with display text
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: Some(text.into()),
            response: None,
            timestamp: Utc::now(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self::new(Severity::Danger, text)
    }

    /// Danger message carrying the failure payload of a transport error
    pub fn danger_from_error(error: &Error) -> Self {
        Self {
            severity: Severity::Danger,
            text: None,
            response: Some(failure_payload(error)),
            timestamp: Utc::now(),
        }
    }
}

/// JSON payload describing a transport failure
///
/// Error bodies that are JSON (CREST error resources) are passed through.
fn failure_payload(error: &Error) -> Value {
    match error {
        Error::HttpStatus { status, body } => {
            let body = serde_json::from_str::<Value>(body)
                .unwrap_or_else(|_| Value::String(body.clone()));
            json!({ "status": status, "body": body })
        }
        other => match other.status() {
            Some(status) => json!({ "status": status, "message": other.to_string() }),
            None => json!({ "message": other.to_string() }),
        },
    }
}
