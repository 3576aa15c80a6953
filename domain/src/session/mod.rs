//! Chat session domain.
//!
//! - [`entities::Message`]: a single message within a conversation
//! - [`entities::History`]: the append-only transcript
//! - [`state::SessionState`]: idle / streaming lifecycle
//! - [`request::ChatRequest`]: wire body for one turn
//! - [`stream`]: SSE record splitting and payload parsing
//! - [`decoder::Utf8StreamDecoder`]: chunk-boundary-safe UTF-8 decoding

pub mod decoder;
pub mod entities;
pub mod request;
pub mod state;
pub mod stream;
