//! Use cases (application services)
//!
//! - [`chat_session::ChatSession`]: one streaming chat conversation

pub mod chat_session;
