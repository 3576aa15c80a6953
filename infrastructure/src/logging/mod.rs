//! Structured conversation logging.
//!
//! Provides [`JsonlConversationLogger`], an append-only JSONL transcript that
//! implements the [`ConversationLogger`](streamchat_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
