//! Session lifecycle state

use std::fmt;

/// Whether a turn is currently in flight.
///
/// Only one stream may be active at a time; sends while `Streaming` are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Streaming,
}

impl SessionState {
    pub fn is_streaming(&self) -> bool {
        matches!(self, SessionState::Streaming)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::Streaming => f.write_str("streaming"),
        }
    }
}
