//! Message hub implementation
//!
//! Broadcasts messages to any number of subscribers and mirrors them to the
//! log.

use super::types::Message;
use crate::types::{Severity, StringMap};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Default number of undelivered messages kept per subscriber
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Receives notifications
pub trait MessageSink: Send + Sync {
    /// Deliver a message. Never blocks and never fails.
    fn add_message(&self, message: Message);
}

/// Process-wide notification channel
#[derive(Debug)]
pub struct MessageHub {
    sender: broadcast::Sender<Message>,
    catalog: StringMap,
}

impl Default for MessageHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl MessageHub {
    /// Create a hub keeping up to `capacity` messages per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            catalog: StringMap::new(),
        }
    }

    /// Attach an i18n message catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: StringMap) -> Self {
        self.catalog = catalog;
        self
    }

    /// Subscribe to messages sent from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.sender.subscribe()
    }

    /// Translate a catalog key, falling back to the key itself
    pub fn translate(&self, key: &str) -> String {
        self.catalog
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Send a message whose text is a catalog key
    pub fn add_i18n(&self, severity: Severity, key: &str) {
        self.add_message(Message::new(severity, self.translate(key)));
    }
}

impl MessageSink for MessageHub {
    fn add_message(&self, message: Message) {
        let text = message.text.as_deref().unwrap_or_default();
        match message.severity {
            Severity::Danger => error!(response = ?message.response, "{}", text),
            Severity::Warning => warn!("{}", text),
            Severity::Info | Severity::Success => info!("{}", text),
        }
        // No subscribers is not an error
        let _ = self.sender.send(message);
    }
}
