//! Line-oriented [`ChatView`] for a terminal.
//!
//! Entries are printed as they arrive. Streaming updates that extend the
//! text already on screen only print the new suffix; any other update
//! reprints the entry on a fresh line.

use crate::output::console::ConsoleFormatter;
use crate::progress::typing::TypingIndicator;
use std::io::{self, Stdout, Write};
use streamchat_application::{ChatView, MessageHandle};
use streamchat_domain::Role;

const TYPING_MESSAGE: &str = "Assistant is typing...";

struct Entry {
    role: Role,
    text: String,
}

/// Terminal rendering surface.
///
/// Write failures are ignored: a closed stdout must not abort the turn.
pub struct TerminalView<W: Write + Send = Stdout> {
    out: W,
    entries: Vec<Entry>,
    /// Entry whose full text is on the current, still open, output line.
    open_entry: Option<usize>,
    typing: TypingIndicator,
    echo_user: bool,
    labels: bool,
    input_enabled: bool,
}

impl TerminalView<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            entries: Vec::new(),
            open_entry: None,
            typing: TypingIndicator::new(true),
            echo_user: true,
            labels: true,
            input_enabled: true,
        }
    }

    /// Print user messages. Off in the REPL, where the line editor already
    /// shows what was typed.
    pub fn with_echo_user(mut self, echo: bool) -> Self {
        self.echo_user = echo;
        self
    }

    /// Prefix entries with `You:` / `Assistant:`.
    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_typing_indicator(mut self, enabled: bool) -> Self {
        self.typing = TypingIndicator::new(enabled);
        self
    }

    pub fn entry_text(&self, handle: MessageHandle) -> Option<&str> {
        self.entries.get(handle.0).map(|e| e.text.as_str())
    }

    #[cfg(test)]
    pub(crate) fn entry_count(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    #[cfg(test)]
    pub(crate) fn writer(&self) -> &W {
        &self.out
    }

    fn close_line(&mut self) {
        if self.open_entry.take().is_some() {
            let _ = writeln!(self.out);
        }
    }

    fn open_line(&mut self, index: usize) {
        self.close_line();
        if self.labels {
            let label = ConsoleFormatter::role_label(self.entries[index].role);
            let _ = write!(self.out, "{} ", label);
        }
        self.open_entry = Some(index);
    }

    fn render_full(&mut self, index: usize) {
        self.open_line(index);
        let _ = write!(self.out, "{}", self.entries[index].text);
    }
}

impl<W: Write + Send> ChatView for TerminalView<W> {
    fn append_message(&mut self, role: Role, initial_text: &str) -> MessageHandle {
        self.entries.push(Entry {
            role,
            text: initial_text.to_string(),
        });
        let index = self.entries.len() - 1;

        match role {
            Role::User if self.echo_user => self.render_full(index),
            Role::User => self.close_line(),
            // Assistant entries open their line on first text so the
            // spinner has the terminal to itself until then.
            Role::Assistant if !initial_text.is_empty() => self.render_full(index),
            Role::Assistant => self.close_line(),
        }

        MessageHandle(index)
    }

    fn show_typing(&mut self, _handle: MessageHandle) {
        let _ = self.out.flush();
        self.typing.start(TYPING_MESSAGE);
    }

    fn update_message_text(&mut self, handle: MessageHandle, text: &str) {
        let index = handle.0;
        let Some(entry) = self.entries.get(index) else {
            return;
        };
        self.typing.stop();

        let extends = self.open_entry == Some(index) && text.starts_with(entry.text.as_str());
        if extends {
            let suffix = &text[entry.text.len()..];
            let _ = write!(self.out, "{}", suffix);
            self.entries[index].text = text.to_string();
        } else {
            self.entries[index].text = text.to_string();
            self.render_full(index);
        }
    }

    fn scroll_to_end(&mut self) {
        let _ = self.out.flush();
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        let reenabled = enabled && !self.input_enabled;
        self.input_enabled = enabled;
        if reenabled {
            self.typing.stop();
            self.close_line();
            let _ = self.out.flush();
        }
    }

    fn focus_input(&mut self) {
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> TerminalView<Vec<u8>> {
        colored::control::set_override(false);
        TerminalView::new(Vec::new()).with_typing_indicator(false)
    }

    fn output(view: &TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.writer().clone()).unwrap()
    }

    #[test]
    fn test_streaming_updates_print_only_new_text() {
        let mut view = view();
        view.append_message(Role::User, "hello");
        let reply = view.append_message(Role::Assistant, "");
        view.show_typing(reply);
        view.set_input_enabled(false);

        view.update_message_text(reply, "Hi");
        view.update_message_text(reply, "Hi there");
        view.scroll_to_end();
        view.set_input_enabled(true);

        assert_eq!(output(&view), "You: hello\nAssistant: Hi there\n");
        assert_eq!(view.entry_text(reply), Some("Hi there"));
        assert!(view.is_input_enabled());
    }

    #[test]
    fn test_non_extending_update_reprints_entry() {
        let mut view = view();
        let reply = view.append_message(Role::Assistant, "");
        view.set_input_enabled(false);
        view.update_message_text(reply, "partial");
        view.update_message_text(reply, "Error: HTTP error! status: 500");
        view.set_input_enabled(true);

        assert_eq!(
            output(&view),
            "Assistant: partial\nAssistant: Error: HTTP error! status: 500\n"
        );
    }

    #[test]
    fn test_error_replaces_empty_placeholder() {
        let mut view = view();
        let reply = view.append_message(Role::Assistant, "");
        view.set_input_enabled(false);
        view.update_message_text(reply, "Error: HTTP error! status: 500");
        view.set_input_enabled(true);

        assert_eq!(output(&view), "Assistant: Error: HTTP error! status: 500\n");
    }

    #[test]
    fn test_empty_reply_prints_nothing() {
        let mut view = view();
        view.append_message(Role::User, "hello");
        let reply = view.append_message(Role::Assistant, "");
        view.show_typing(reply);
        view.set_input_enabled(true);

        assert_eq!(output(&view), "You: hello\n");
        assert_eq!(view.entry_text(reply), Some(""));
        assert_eq!(view.entry_count(), 2);
    }

    #[test]
    fn test_echo_and_labels_can_be_disabled() {
        let mut view = view().with_echo_user(false).with_labels(false);
        view.append_message(Role::User, "hello");
        let reply = view.append_message(Role::Assistant, "");
        view.set_input_enabled(false);
        view.update_message_text(reply, "Hi");
        view.set_input_enabled(true);

        assert_eq!(output(&view), "Hi\n");
    }

    #[test]
    fn test_unknown_handle_is_ignored() {
        let mut view = view();
        view.update_message_text(MessageHandle(7), "ghost");
        assert_eq!(output(&view), "");
    }
}
