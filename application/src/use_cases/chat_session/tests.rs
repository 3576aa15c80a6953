use super::*;
use crate::ports::chat_transport::{HealthStatus, collect_stream_text};
use async_trait::async_trait;
use futures::stream;
use std::collections::VecDeque;
use std::sync::Mutex;
use streamchat_domain::StreamChunk;

// ==================== Fakes ====================

enum Scripted {
    /// Body chunks, then end of stream.
    Body(Vec<Result<Vec<u8>, TransportError>>),
    /// Body chunks, then a read that never resolves.
    Hanging(Vec<Result<Vec<u8>, TransportError>>),
    /// Non-streaming response text.
    Unary(String),
    Fail(TransportError),
}

#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, request: &ChatRequest) -> Scripted {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left")
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ByteStream, TransportError> {
        match self.next(request) {
            Scripted::Body(chunks) => Ok(stream::iter(chunks).boxed()),
            Scripted::Hanging(chunks) => Ok(stream::iter(chunks).chain(stream::pending()).boxed()),
            Scripted::Unary(_) => panic!("unary response scripted for a streaming call"),
            Scripted::Fail(e) => Err(e),
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, TransportError> {
        match self.next(request) {
            Scripted::Unary(text) => Ok(text),
            Scripted::Body(chunks) => collect_stream_text(stream::iter(chunks).boxed()).await,
            Scripted::Hanging(_) => panic!("hanging body scripted for a unary call"),
            Scripted::Fail(e) => Err(e),
        }
    }

    async fn health(&self) -> Result<HealthStatus, TransportError> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            service: "scripted".to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    role: Role,
    text: String,
    typing: bool,
}

#[derive(Debug)]
struct RecordingView {
    entries: Vec<Entry>,
    input_enabled: bool,
    focus_count: usize,
    scroll_count: usize,
}

impl Default for RecordingView {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            input_enabled: true,
            focus_count: 0,
            scroll_count: 0,
        }
    }
}

impl RecordingView {
    fn texts(&self) -> Vec<(Role, &str)> {
        self.entries
            .iter()
            .map(|e| (e.role, e.text.as_str()))
            .collect()
    }
}

impl ChatView for RecordingView {
    fn append_message(&mut self, role: Role, initial_text: &str) -> MessageHandle {
        self.entries.push(Entry {
            role,
            text: initial_text.to_string(),
            typing: false,
        });
        MessageHandle(self.entries.len() - 1)
    }

    fn show_typing(&mut self, handle: MessageHandle) {
        self.entries[handle.0].typing = true;
    }

    fn update_message_text(&mut self, handle: MessageHandle, text: &str) {
        let entry = &mut self.entries[handle.0];
        entry.text = text.to_string();
        entry.typing = false;
    }

    fn scroll_to_end(&mut self) {
        self.scroll_count += 1;
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn focus_input(&mut self) {
        self.focus_count += 1;
    }
}

#[derive(Default)]
struct RecordingLogger {
    kinds: Mutex<Vec<ConversationEventKind>>,
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.kinds.lock().unwrap().push(event.kind);
    }
}

// ==================== Helpers ====================

fn delta(text: &str) -> Vec<u8> {
    StreamChunk::delta(text).to_record().into_bytes()
}

fn end_of_turn() -> Vec<u8> {
    StreamChunk::end_of_turn().to_record().into_bytes()
}

fn session(transport: &Arc<ScriptedTransport>) -> ChatSession<ScriptedTransport, RecordingView> {
    ChatSession::new(
        transport.clone(),
        RecordingView::default(),
        GenerationParams::default(),
    )
}

fn assert_idle_and_ready(session: &ChatSession<ScriptedTransport, RecordingView>) {
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.partial_response().is_none());
    assert!(session.view().input_enabled);
    assert!(session.view().focus_count > 0);
}

// ==================== Normal turns ====================

#[tokio::test]
async fn hello_example_streams_and_commits() {
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![
        Ok(delta("Hel")),
        Ok(delta("lo")),
        Ok(end_of_turn()),
    ])]);
    let mut session = session(&transport);

    let outcome = session.submit("Hi").await;

    assert_eq!(
        outcome,
        TurnOutcome::Completed {
            response: Some("Hello".to_string())
        }
    );
    assert_eq!(
        session.history().messages(),
        &[Message::user("Hi"), Message::assistant("Hello")]
    );
    assert_eq!(
        session.view().texts(),
        vec![(Role::User, "Hi"), (Role::Assistant, "Hello")]
    );
    assert_idle_and_ready(&session);
}

#[tokio::test]
async fn body_ending_inside_a_character_still_commits_earlier_text() {
    let mut tail = delta("Hi");
    tail.push(0xC3);
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![Ok(tail)])]);
    let mut session = session(&transport);

    let outcome = session.submit("hello").await;

    assert_eq!(
        outcome,
        TurnOutcome::Completed {
            response: Some("Hi".to_string())
        }
    );
    assert_eq!(session.view().texts()[1], (Role::Assistant, "Hi"));
    assert_idle_and_ready(&session);
}

#[tokio::test]
async fn records_in_one_chunk_and_across_chunks_concatenate_in_order() {
    let mut body = delta("a");
    body.extend(delta("b"));
    body.extend(delta("c"));
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![
        Ok(body),
        Ok(delta("d")),
        Ok(end_of_turn()),
    ])]);
    let mut session = session(&transport);

    session.submit("go").await;

    assert_eq!(session.history().last(), Some(&Message::assistant("abcd")));
    assert_eq!(session.view().entries[1].text, "abcd");
    // user entry + one scroll per applied record
    assert!(session.view().scroll_count >= 4);
}

#[tokio::test]
async fn input_is_trimmed_before_sending() {
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![Ok(end_of_turn())])]);
    let mut session = session(&transport);

    session.submit("  hello \n").await;

    assert_eq!(session.history().messages()[0], Message::user("hello"));
    assert_eq!(transport.requests()[0].messages[0].content, "hello");
}

#[tokio::test]
async fn request_carries_full_history_and_params() {
    let transport = ScriptedTransport::new(vec![
        Scripted::Body(vec![Ok(delta("first answer"))]),
        Scripted::Body(vec![Ok(delta("second answer"))]),
    ]);
    let params = GenerationParams::default()
        .with_model("test-model")
        .with_max_tokens(64)
        .with_temperature(0.2);
    let mut session = ChatSession::new(transport.clone(), RecordingView::default(), params);

    session.submit("one").await;
    session.submit("two").await;

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].messages, vec![Message::user("one")]);
    assert_eq!(
        requests[1].messages,
        vec![
            Message::user("one"),
            Message::assistant("first answer"),
            Message::user("two"),
        ]
    );
    assert_eq!(requests[1].model, "test-model");
    assert_eq!(requests[1].max_tokens, 64);
    assert_eq!(requests[1].temperature, 0.2);
    assert_eq!(session.history().len(), 4);
}

#[tokio::test]
async fn final_record_contributes_no_text() {
    let final_with_content = StreamChunk {
        content: "should not appear".to_string(),
        is_final: true,
    }
    .to_record()
    .into_bytes();
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![
        Ok(delta("kept")),
        Ok(final_with_content),
    ])]);
    let mut session = session(&transport);

    session.submit("q").await;

    assert_eq!(session.history().last(), Some(&Message::assistant("kept")));
}

#[tokio::test]
async fn empty_response_commits_nothing() {
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![Ok(end_of_turn())])]);
    let mut session = session(&transport);

    let outcome = session.submit("q").await;

    assert_eq!(outcome, TurnOutcome::Completed { response: None });
    assert_eq!(session.history().messages(), &[Message::user("q")]);
    assert!(session.view().entries[1].typing);
    assert_idle_and_ready(&session);
}

// ==================== Malformed input ====================

#[tokio::test]
async fn malformed_record_does_not_block_following_records() {
    let mut body = delta("good ");
    body.extend(b"data: {not json}\n\n");
    body.extend(delta("still good"));
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![Ok(body)])]);
    let logger = Arc::new(RecordingLogger::default());
    let mut session = session(&transport).with_conversation_logger(logger.clone());

    let outcome = session.submit("q").await;

    assert_eq!(
        outcome,
        TurnOutcome::Completed {
            response: Some("good still good".to_string())
        }
    );
    assert!(
        logger
            .kinds
            .lock()
            .unwrap()
            .contains(&ConversationEventKind::RecordParseError)
    );
}

#[tokio::test]
async fn record_torn_across_chunks_is_dropped_and_stream_continues() {
    let torn = delta("lost");
    let (head, tail) = torn.split_at(torn.len() / 2);
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![
        Ok(delta("a")),
        Ok(head.to_vec()),
        Ok(tail.to_vec()),
        Ok(delta("b")),
    ])]);
    let mut session = session(&transport);

    session.submit("q").await;

    assert_eq!(session.history().last(), Some(&Message::assistant("ab")));
}

#[tokio::test]
async fn non_data_segments_are_ignored() {
    let mut body = b": comment\n\nevent: ping\n\n".to_vec();
    body.extend(delta("x"));
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![Ok(body)])]);
    let mut session = session(&transport);

    session.submit("q").await;

    assert_eq!(session.history().last(), Some(&Message::assistant("x")));
}

// ==================== Gating ====================

#[tokio::test]
async fn blank_input_is_ignored() {
    let transport = ScriptedTransport::new(vec![]);
    let mut session = session(&transport);

    assert!(matches!(
        session.send_message("   \t").await,
        SendOutcome::Ignored
    ));
    assert_eq!(session.submit("").await, TurnOutcome::Ignored);

    assert!(session.history().is_empty());
    assert!(session.view().entries.is_empty());
    assert!(transport.requests().is_empty());
    assert_eq!(session.state(), SessionState::Idle);
}

#[tokio::test]
async fn send_while_streaming_is_a_strict_no_op() {
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![Ok(delta("done"))])]);
    let mut session = session(&transport);

    let SendOutcome::Streaming(first) = session.send_message("first").await else {
        panic!("first send should stream");
    };
    assert_eq!(session.state(), SessionState::Streaming);
    assert_eq!(session.partial_response(), Some(""));
    assert!(!session.view().input_enabled);

    let view_before = session.view().entries.clone();
    let history_before = session.history().clone();

    let second = session.send_message("second").await;

    assert!(matches!(second, SendOutcome::Ignored));
    assert_eq!(session.history(), &history_before);
    assert_eq!(session.view().entries, view_before);
    assert_eq!(session.partial_response(), Some(""));
    assert_eq!(transport.requests().len(), 1);
    assert!(!first.is_cancelled());

    session.consume_stream().await;
    assert_eq!(session.history().len(), 2);
    assert_idle_and_ready(&session);
}

#[tokio::test]
async fn send_prelude_renders_placeholder_and_disables_input() {
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![])]);
    let mut session = session(&transport);

    session.send_message("Hi").await;

    let view = session.view();
    assert_eq!(view.entries.len(), 2);
    assert_eq!(view.entries[0].role, Role::User);
    assert_eq!(view.entries[0].text, "Hi");
    assert_eq!(view.entries[1].role, Role::Assistant);
    assert!(view.entries[1].typing);
    assert!(!view.input_enabled);
    assert_eq!(session.history().messages(), &[Message::user("Hi")]);
}

#[tokio::test]
async fn consume_without_stream_is_ignored() {
    let transport = ScriptedTransport::new(vec![]);
    let mut session = session(&transport);
    assert_eq!(session.consume_stream().await, TurnOutcome::Ignored);
}

// ==================== Errors ====================

#[tokio::test]
async fn transport_error_replaces_placeholder_and_resets() {
    let transport =
        ScriptedTransport::new(vec![Scripted::Fail(TransportError::Status(500))]);
    let logger = Arc::new(RecordingLogger::default());
    let mut session = session(&transport).with_conversation_logger(logger.clone());

    let outcome = session.send_message("Hi").await;

    assert!(matches!(
        outcome,
        SendOutcome::Failed(TransportError::Status(500))
    ));
    assert_eq!(
        session.view().texts(),
        vec![
            (Role::User, "Hi"),
            (Role::Assistant, "Error: HTTP error! status: 500")
        ]
    );
    assert_eq!(session.history().messages(), &[Message::user("Hi")]);
    assert_idle_and_ready(&session);
    assert_eq!(
        *logger.kinds.lock().unwrap(),
        vec![
            ConversationEventKind::UserMessage,
            ConversationEventKind::TransportError
        ]
    );
}

#[tokio::test]
async fn read_error_keeps_partial_text_visible_but_uncommitted() {
    let read_error = TransportError::Read("connection reset".to_string());
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![
        Ok(delta("partial ")),
        Ok(delta("text")),
        Err(read_error.clone()),
        Ok(delta("never read")),
    ])]);
    let mut session = session(&transport);

    let outcome = session.submit("q").await;

    assert_eq!(outcome, TurnOutcome::ReadFailed(read_error));
    assert!(outcome.is_error());
    assert_eq!(session.view().entries[1].text, "partial text");
    assert_eq!(session.history().messages(), &[Message::user("q")]);
    assert_idle_and_ready(&session);
}

#[tokio::test]
async fn session_recovers_after_a_failed_turn() {
    let transport = ScriptedTransport::new(vec![
        Scripted::Fail(TransportError::Connection("refused".to_string())),
        Scripted::Body(vec![Ok(delta("ok"))]),
    ]);
    let mut session = session(&transport);

    assert!(session.submit("first").await.is_error());
    let outcome = session.submit("second").await;

    assert_eq!(
        outcome,
        TurnOutcome::Completed {
            response: Some("ok".to_string())
        }
    );
    // The failed turn's user message stays in history.
    assert_eq!(
        transport.requests()[1].messages,
        vec![Message::user("first"), Message::user("second")]
    );
}

// ==================== Cancellation ====================

#[tokio::test]
async fn cancelling_mid_stream_never_commits() {
    let transport = ScriptedTransport::new(vec![Scripted::Hanging(vec![Ok(delta("Hel"))])]);
    let logger = Arc::new(RecordingLogger::default());
    let mut session = session(&transport).with_conversation_logger(logger.clone());

    let SendOutcome::Streaming(canceller) = session.send_message("Hi").await else {
        panic!("expected a stream");
    };
    let stopper = canceller.clone();
    let cancel_later = async move {
        tokio::task::yield_now().await;
        stopper.cancel();
    };

    let (outcome, ()) = tokio::join!(session.consume_stream(), cancel_later);

    assert_eq!(outcome, TurnOutcome::Cancelled);
    assert!(canceller.is_cancelled());
    assert_eq!(session.view().entries[1].text, "Hel");
    assert_eq!(session.history().messages(), &[Message::user("Hi")]);
    assert_idle_and_ready(&session);
    assert!(
        logger
            .kinds
            .lock()
            .unwrap()
            .contains(&ConversationEventKind::StreamCancelled)
    );
}

#[tokio::test]
async fn explicit_cancel_before_consuming_resets_without_commit() {
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![Ok(delta("unused"))])]);
    let mut session = session(&transport);

    let SendOutcome::Streaming(canceller) = session.send_message("Hi").await else {
        panic!("expected a stream");
    };
    session.cancel();

    assert!(canceller.is_cancelled());
    assert_idle_and_ready(&session);
    assert_eq!(session.consume_stream().await, TurnOutcome::Ignored);
    assert_eq!(session.history().messages(), &[Message::user("Hi")]);
}

#[tokio::test]
async fn canceller_fired_before_consume_stops_the_loop() {
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![Ok(delta("unused"))])]);
    let mut session = session(&transport);

    let SendOutcome::Streaming(canceller) = session.send_message("Hi").await else {
        panic!("expected a stream");
    };
    canceller.cancel();

    assert_eq!(session.consume_stream().await, TurnOutcome::Cancelled);
    assert_eq!(session.history().len(), 1);
    assert_idle_and_ready(&session);
}

#[tokio::test]
async fn reset_to_idle_is_idempotent() {
    let transport = ScriptedTransport::new(vec![]);
    let mut session = session(&transport);

    session.reset_to_idle();
    session.reset_to_idle();

    assert_idle_and_ready(&session);
    assert_eq!(session.view().focus_count, 2);
}

// ==================== Non-streaming turns ====================

#[tokio::test]
async fn unary_turn_replaces_placeholder_and_commits() {
    let transport = ScriptedTransport::new(vec![Scripted::Unary("Hello there".to_string())]);
    let mut session = session(&transport);

    let outcome = session.send_message_unary("Hi").await;

    assert_eq!(
        outcome,
        TurnOutcome::Completed {
            response: Some("Hello there".to_string())
        }
    );
    assert_eq!(session.view().entries[1].text, "Hello there");
    assert_eq!(
        session.history().messages(),
        &[Message::user("Hi"), Message::assistant("Hello there")]
    );
    assert_idle_and_ready(&session);
}

#[tokio::test]
async fn unary_turn_failure_shows_error() {
    let transport = ScriptedTransport::new(vec![Scripted::Fail(TransportError::Status(503))]);
    let mut session = session(&transport);

    let outcome = session.send_message_unary("Hi").await;

    assert_eq!(
        outcome,
        TurnOutcome::TransportFailed(TransportError::Status(503))
    );
    assert_eq!(
        session.view().entries[1].text,
        "Error: HTTP error! status: 503"
    );
    assert_eq!(session.history().len(), 1);
    assert_idle_and_ready(&session);
}

#[tokio::test]
async fn logger_sees_user_then_assistant_message() {
    let transport = ScriptedTransport::new(vec![Scripted::Body(vec![Ok(delta("a"))])]);
    let logger = Arc::new(RecordingLogger::default());
    let mut session = session(&transport).with_conversation_logger(logger.clone());

    session.submit("q").await;

    assert_eq!(
        *logger.kinds.lock().unwrap(),
        vec![
            ConversationEventKind::UserMessage,
            ConversationEventKind::AssistantMessage
        ]
    );
}
