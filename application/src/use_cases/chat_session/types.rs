//! Outcome and handle types for [`ChatSession`](super::ChatSession).

use crate::ports::chat_transport::TransportError;
use tokio_util::sync::CancellationToken;

/// Result of starting a turn with [`send_message`](super::ChatSession::send_message).
#[derive(Debug)]
pub enum SendOutcome {
    /// Blank input, or a turn is already streaming. Nothing changed.
    Ignored,
    /// The server accepted the turn; the stream is waiting to be consumed.
    Streaming(StreamCanceller),
    /// The request failed before a stream existed. The session is idle again.
    Failed(TransportError),
}

/// Terminal result of a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Nothing was started (blank input, busy session, or no stream to consume).
    Ignored,
    /// The stream ended normally. `response` is the committed assistant text,
    /// `None` when the turn produced no text.
    Completed { response: Option<String> },
    /// The request failed before streaming began.
    TransportFailed(TransportError),
    /// Reading the body failed mid-stream; partial text was not committed.
    ReadFailed(TransportError),
    /// The stream was cancelled; partial text was not committed.
    Cancelled,
}

impl TurnOutcome {
    /// Whether the turn ended with an error shown to the user.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            TurnOutcome::TransportFailed(_) | TurnOutcome::ReadFailed(_)
        )
    }
}

/// Cancels an in-flight stream from outside the consumption loop.
///
/// Cloneable and cheap; cancelling after the turn has ended is a no-op.
#[derive(Debug, Clone, Default)]
pub struct StreamCanceller {
    token: CancellationToken,
}

impl StreamCanceller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[cfg(test)]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(super) fn token(&self) -> &CancellationToken {
        &self.token
    }
}
