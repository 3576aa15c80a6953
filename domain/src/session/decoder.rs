//! Incremental UTF-8 decoding for chunked response bodies.

use std::char::REPLACEMENT_CHARACTER;

/// Decodes a byte stream chunk by chunk.
///
/// A multi-byte character split across two chunks is held back until the
/// rest of its bytes arrive, so no chunk boundary ever produces a spurious
/// replacement character. Genuinely invalid sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning every complete character so far.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut out = String::with_capacity(input.len());
        let mut rest = input.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    if let Ok(valid) = std::str::from_utf8(valid) {
                        out.push_str(valid);
                    }
                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        // Incomplete sequence at the end: wait for more bytes.
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Number of bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Flush at end of stream. A dangling partial sequence becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            REPLACEMENT_CHARACTER.to_string()
        }
    }
}
