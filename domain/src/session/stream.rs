//! Server-sent-event records for streamed chat responses.
//!
//! The server writes one record per text fragment:
//!
//! ```text
//! data: {"content":"Hel","is_final":false}\n\n
//! data: {"content":"lo","is_final":false}\n\n
//! data: {"content":"","is_final":true}\n\n
//! ```
//!
//! Records are cut with a plain split on [`RECORD_SEPARATOR`] over each
//! decoded chunk. Segments are never stitched back together across chunks:
//! a record torn by a chunk boundary shows up as one segment without the
//! [`DATA_PREFIX`] (dropped) and/or one with a truncated payload (a parse
//! error the caller skips).

use super::decoder::Utf8StreamDecoder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Literal prefix of a data record.
pub const DATA_PREFIX: &str = "data: ";

/// Separator between records.
pub const RECORD_SEPARATOR: &str = "\n\n";

/// Payload of a single data record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Incremental text fragment.
    #[serde(default)]
    pub content: String,
    /// End-of-turn marker. A final record contributes no text.
    #[serde(default)]
    pub is_final: bool,
}

impl StreamChunk {
    pub fn delta(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_final: false,
        }
    }

    pub fn end_of_turn() -> Self {
        Self {
            content: String::new(),
            is_final: true,
        }
    }

    /// Text to append to the running response, `None` for the final marker.
    pub fn text(&self) -> Option<&str> {
        if self.is_final {
            None
        } else {
            Some(&self.content)
        }
    }

    /// Encode as a complete wire record, separator included.
    pub fn to_record(&self) -> String {
        // Serializing two plain fields cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        format!("{DATA_PREFIX}{json}{RECORD_SEPARATOR}")
    }
}

/// A single record whose payload could not be parsed.
#[derive(Debug, Error)]
#[error("Malformed stream record: {source} (payload: {payload:?})")]
pub struct RecordParseError {
    pub payload: String,
    #[source]
    pub source: serde_json::Error,
}

/// Split decoded text into candidate records.
pub fn split_records(text: &str) -> impl Iterator<Item = &str> {
    text.split(RECORD_SEPARATOR)
}

/// Parse one candidate record.
///
/// Returns `None` when the segment is not a data record (it does not start
/// with [`DATA_PREFIX`]); such segments are silently ignored by consumers.
pub fn parse_record(segment: &str) -> Option<Result<StreamChunk, RecordParseError>> {
    let payload = segment.strip_prefix(DATA_PREFIX)?;
    Some(
        serde_json::from_str(payload).map_err(|source| RecordParseError {
            payload: payload.to_string(),
            source,
        }),
    )
}

/// Chunk-at-a-time record reader: decode, split, parse.
///
/// Holds only the UTF-8 decoder state between chunks; record text is not
/// buffered across chunk boundaries.
#[derive(Debug, Default)]
pub struct RecordReader {
    decoder: Utf8StreamDecoder,
}

impl RecordReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of body bytes, yielding its data records in textual order.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Result<StreamChunk, RecordParseError>> {
        let text = self.decoder.decode(bytes);
        split_records(&text).filter_map(parse_record).collect()
    }

    /// Close the reader at end of body. Returns how many bytes of an
    /// unfinished character were dropped; they can never complete a record.
    pub fn finish(&mut self) -> usize {
        let dangling = self.decoder.pending_len();
        self.decoder.finish();
        dangling
    }
}
