//! Chat view port
//!
//! The rendering surface the session drives: a transcript of message
//! entries plus an input control that can be disabled while a turn runs.

use streamchat_domain::Role;

/// Opaque reference to a rendered message entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub usize);

/// Rendering surface for a chat session.
///
/// The view is owned by the session and only mutated from its control flow.
/// Implementations live in the presentation layer.
pub trait ChatView: Send {
    /// Add a message entry and return a handle to it.
    fn append_message(&mut self, role: Role, initial_text: &str) -> MessageHandle;

    /// Mark an entry as a "typing" placeholder.
    fn show_typing(&mut self, handle: MessageHandle);

    /// Replace the whole displayed text of an entry.
    fn update_message_text(&mut self, handle: MessageHandle, text: &str);

    fn scroll_to_end(&mut self);

    fn set_input_enabled(&mut self, enabled: bool);

    fn focus_input(&mut self);
}
