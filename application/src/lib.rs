//! Application layer for streamchat
//!
//! This crate contains the chat session use case and the port definitions
//! its collaborators implement. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    chat_transport::{ByteStream, ChatTransport, HealthStatus, TransportError, collect_stream_text},
    chat_view::{ChatView, MessageHandle},
    conversation_logger::{
        ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
    },
};
pub use use_cases::chat_session::{ChatSession, SendOutcome, StreamCanceller, TurnOutcome};
