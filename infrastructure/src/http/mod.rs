//! HTTP adapter
//!
//! Implements [`ChatTransport`](streamchat_application::ChatTransport) over
//! reqwest against the chat server's `/api/chat/*` endpoints.

pub mod error;
pub mod protocol;
pub mod transport;
