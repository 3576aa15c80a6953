//! Streaming chat session use case.
//!
//! [`ChatSession`] owns the conversation history and drives one turn at a
//! time through its lifecycle:
//!
//! ```text
//! Idle ──send_message──▶ Streaming ──consume_stream──▶ Idle
//!                            │   end of body: commit text
//!                            │   read error:  keep text on screen, no commit
//!                            └── cancel:      keep text on screen, no commit
//! ```
//!
//! The view is updated synchronously between awaits, so each chunk is
//! decoded, split, parsed and rendered as one step.

mod types;

#[cfg(test)]
mod tests;

pub use types::{SendOutcome, StreamCanceller, TurnOutcome};

use crate::ports::chat_transport::{ByteStream, ChatTransport, TransportError};
use crate::ports::chat_view::{ChatView, MessageHandle};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
};
use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;
use streamchat_domain::{
    ChatRequest, GenerationParams, History, Message, RecordReader, Role, SessionState,
};
use tracing::{debug, info, warn};

/// State of the turn in flight. Exists iff the session is streaming.
struct ActiveTurn {
    placeholder: MessageHandle,
    /// Accumulated assistant text (the partial response).
    partial: String,
    stream: Option<ByteStream>,
    reader: RecordReader,
    canceller: StreamCanceller,
}

/// One chat conversation against a streaming server.
pub struct ChatSession<T: ChatTransport + 'static, V: ChatView> {
    transport: Arc<T>,
    view: V,
    params: GenerationParams,
    history: History,
    turn: Option<ActiveTurn>,
    logger: Arc<dyn ConversationLogger>,
}

impl<T: ChatTransport + 'static, V: ChatView> ChatSession<T, V> {
    pub fn new(transport: Arc<T>, view: V, params: GenerationParams) -> Self {
        Self {
            transport,
            view,
            params,
            history: History::new(),
            turn: None,
            logger: Arc::new(NoConversationLogger),
        }
    }

    /// Record conversation events to a structured log
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    // ==================== Accessors ====================

    pub fn state(&self) -> SessionState {
        if self.turn.is_some() {
            SessionState::Streaming
        } else {
            SessionState::Idle
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Assistant text accumulated so far; `None` while idle.
    pub fn partial_response(&self) -> Option<&str> {
        self.turn.as_ref().map(|t| t.partial.as_str())
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    // ==================== Turn lifecycle ====================

    /// Start a streaming turn.
    ///
    /// Ignored when `text` is blank or a turn is already streaming. On
    /// success the response body is held until [`consume_stream`](Self::consume_stream)
    /// is awaited; the returned canceller can stop it from another task.
    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let Some(placeholder) = self.begin_turn(text) else {
            return SendOutcome::Ignored;
        };

        let request = ChatRequest::new(&self.history, &self.params);
        match self.transport.open_stream(&request).await {
            Ok(stream) => {
                let Some(turn) = self.turn.as_mut() else {
                    return SendOutcome::Ignored;
                };
                turn.stream = Some(stream);
                let canceller = turn.canceller.clone();
                debug!("Stream opened for turn {}", self.history.len());
                SendOutcome::Streaming(canceller)
            }
            Err(e) => {
                self.fail_turn(placeholder, &e);
                SendOutcome::Failed(e)
            }
        }
    }

    /// Run the pull loop over the held stream until it terminates.
    pub async fn consume_stream(&mut self) -> TurnOutcome {
        let Some(turn) = self.turn.as_mut() else {
            return TurnOutcome::Ignored;
        };
        let Some(mut stream) = turn.stream.take() else {
            return TurnOutcome::Ignored;
        };
        let token = turn.canceller.token().clone();

        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    // The stream is dropped on return, which aborts the read.
                    self.abandon_turn();
                    return TurnOutcome::Cancelled;
                }
                next = stream.next() => next,
            };

            match next {
                Some(Ok(bytes)) => self.apply_chunk(&bytes),
                Some(Err(e)) => {
                    warn!("Stream read failed: {}", e);
                    self.log(
                        ConversationEventKind::StreamError,
                        json!({
                            "error": e.to_string(),
                            "partial_bytes": self.partial_response().map_or(0, str::len),
                        }),
                    );
                    self.reset_to_idle();
                    return TurnOutcome::ReadFailed(e);
                }
                None => {
                    self.finish_reader();
                    return self.complete_turn();
                }
            }
        }
    }

    /// Start a turn and consume its stream to the end.
    pub async fn submit(&mut self, text: &str) -> TurnOutcome {
        match self.send_message(text).await {
            SendOutcome::Ignored => TurnOutcome::Ignored,
            SendOutcome::Failed(e) => TurnOutcome::TransportFailed(e),
            SendOutcome::Streaming(_) => self.consume_stream().await,
        }
    }

    /// Run a turn against the non-streaming endpoint.
    ///
    /// Same gating and view lifecycle as [`send_message`](Self::send_message);
    /// the placeholder is replaced once with the full response.
    pub async fn send_message_unary(&mut self, text: &str) -> TurnOutcome {
        let Some(placeholder) = self.begin_turn(text) else {
            return TurnOutcome::Ignored;
        };

        let request = ChatRequest::new(&self.history, &self.params);
        match self.transport.complete(&request).await {
            Ok(response) => {
                self.view.update_message_text(placeholder, &response);
                self.view.scroll_to_end();
                if let Some(turn) = self.turn.as_mut() {
                    turn.partial = response;
                }
                self.complete_turn()
            }
            Err(e) => {
                self.fail_turn(placeholder, &e);
                TurnOutcome::TransportFailed(e)
            }
        }
    }

    /// Stop the turn in flight without committing its text.
    ///
    /// For use when [`consume_stream`](Self::consume_stream) is not running;
    /// a running loop is stopped through its [`StreamCanceller`] instead.
    pub fn cancel(&mut self) {
        if let Some(turn) = self.turn.as_ref() {
            turn.canceller.cancel();
            self.abandon_turn();
        }
    }

    /// Return to idle: input enabled and focused, partial response and stream
    /// reference dropped. Safe to call repeatedly.
    pub fn reset_to_idle(&mut self) {
        self.view.set_input_enabled(true);
        self.view.focus_input();
        self.turn = None;
    }

    // ==================== Internals ====================

    /// Validate input and run the shared turn prelude. Returns the placeholder.
    fn begin_turn(&mut self, text: &str) -> Option<MessageHandle> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank message");
            return None;
        }
        // The only stream handle lives in `turn`, so this also keeps a
        // single read loop per session.
        if self.state().is_streaming() {
            debug!("Ignoring message while a turn is streaming");
            return None;
        }

        if let Err(e) = self.history.push(Message::user(text)) {
            warn!("Rejected user message: {}", e);
            return None;
        }
        self.log(ConversationEventKind::UserMessage, json!({ "content": text }));
        info!("Sending turn {} ({} chars)", self.history.len(), text.len());

        self.view.append_message(Role::User, text);
        let placeholder = self.view.append_message(Role::Assistant, "");
        self.view.show_typing(placeholder);
        self.view.set_input_enabled(false);

        self.turn = Some(ActiveTurn {
            placeholder,
            partial: String::new(),
            stream: None,
            reader: RecordReader::new(),
            canceller: StreamCanceller::new(),
        });
        Some(placeholder)
    }

    /// Decode, split and parse one chunk, rendering each text record.
    fn apply_chunk(&mut self, bytes: &[u8]) {
        let Some(turn) = self.turn.as_mut() else {
            return;
        };
        debug!("Received {} bytes", bytes.len());

        for record in turn.reader.feed(bytes) {
            let chunk = match record {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!("Failed to parse stream record: {}", e);
                    self.logger.log(ConversationEvent::new(
                        ConversationEventKind::RecordParseError,
                        json!({ "error": e.source.to_string(), "payload": e.payload }),
                    ));
                    continue;
                }
            };
            let Some(text) = chunk.text() else {
                continue;
            };
            turn.partial.push_str(text);
            self.view.update_message_text(turn.placeholder, &turn.partial);
            self.view.scroll_to_end();
        }
    }

    /// Close the decoder at end of body.
    fn finish_reader(&mut self) {
        let Some(turn) = self.turn.as_mut() else {
            return;
        };
        let dropped = turn.reader.finish();
        if dropped > 0 {
            warn!("Stream ended inside a character; dropped {} bytes", dropped);
        }
    }

    /// Normal end of stream: commit non-empty text, then go idle.
    fn complete_turn(&mut self) -> TurnOutcome {
        let partial = self
            .turn
            .as_mut()
            .map(|t| std::mem::take(&mut t.partial))
            .unwrap_or_default();

        let response = if partial.is_empty() {
            None
        } else {
            match self.history.push(Message::assistant(partial.clone())) {
                Ok(()) => {
                    self.log(
                        ConversationEventKind::AssistantMessage,
                        json!({ "content": partial }),
                    );
                    Some(partial)
                }
                Err(e) => {
                    warn!("Could not commit assistant message: {}", e);
                    None
                }
            }
        };

        info!(
            "Turn complete ({} chars)",
            response.as_deref().map_or(0, str::len)
        );
        self.reset_to_idle();
        TurnOutcome::Completed { response }
    }

    /// Transport failure: show the error in place of the placeholder.
    fn fail_turn(&mut self, placeholder: MessageHandle, error: &TransportError) {
        warn!("Chat request failed: {}", error);
        self.log(
            ConversationEventKind::TransportError,
            json!({ "error": error.to_string() }),
        );
        self.view
            .update_message_text(placeholder, &format!("Error: {}", error));
        self.view.scroll_to_end();
        self.reset_to_idle();
    }

    /// Cancellation: drop the turn without committing.
    fn abandon_turn(&mut self) {
        let partial_len = self.partial_response().map_or(0, str::len);
        info!("Turn cancelled after {} chars", partial_len);
        self.log(
            ConversationEventKind::StreamCancelled,
            json!({ "partial_bytes": partial_len }),
        );
        self.reset_to_idle();
    }

    fn log(&self, kind: ConversationEventKind, payload: serde_json::Value) {
        self.logger.log(ConversationEvent::new(kind, payload));
    }
}
