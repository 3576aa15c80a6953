//! Port for structured conversation logging.
//!
//! Separate from `tracing`: tracing carries human-readable diagnostics while
//! this port records the transcript and turn outcomes in a machine-readable
//! form (one record per event).

use serde_json::Value;

/// What happened during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationEventKind {
    UserMessage,
    AssistantMessage,
    TransportError,
    StreamError,
    StreamCancelled,
    RecordParseError,
}

impl ConversationEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationEventKind::UserMessage => "user_message",
            ConversationEventKind::AssistantMessage => "assistant_message",
            ConversationEventKind::TransportError => "transport_error",
            ConversationEventKind::StreamError => "stream_error",
            ConversationEventKind::StreamCancelled => "stream_cancelled",
            ConversationEventKind::RecordParseError => "record_parse_error",
        }
    }
}

/// A structured conversation event.
pub struct ConversationEvent {
    pub kind: ConversationEventKind,
    /// Event-specific fields.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(kind: ConversationEventKind, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// Sink for conversation events.
///
/// `log` is synchronous and infallible; a failing sink must not disturb the
/// turn it is recording.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
