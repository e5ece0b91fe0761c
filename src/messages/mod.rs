//! Messages module
//!
//! Process-wide notification channel. Transport failures are reported here
//! as `danger` messages; delivery is fire-and-forget and never affects paging
//! state.

mod hub;
mod types;

pub use hub::{MessageHub, MessageSink, DEFAULT_CHANNEL_CAPACITY};
pub use types::Message;
