//! Domain layer for streamchat
//!
//! This crate contains the core entities and value objects of a streaming
//! chat exchange. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## History
//!
//! An append-only transcript of [`Message`]s. User messages are appended as
//! soon as they are sent; assistant messages only once their stream ends.
//!
//! ## Stream records
//!
//! The server answers with a byte stream of `data: <json>\n\n` records.
//! [`Utf8StreamDecoder`] turns raw chunks into text, [`split_records`] cuts the
//! text into candidate records and [`parse_record`] reads each payload into a
//! [`StreamChunk`].

pub mod core;
pub mod session;

// Re-export commonly used types
pub use core::{error::DomainError, generation::GenerationParams};
pub use session::{
    decoder::Utf8StreamDecoder,
    entities::{History, Message, Role},
    request::ChatRequest,
    state::SessionState,
    stream::{
        DATA_PREFIX, RECORD_SEPARATOR, RecordParseError, RecordReader, StreamChunk, parse_record,
        split_records,
    },
};
