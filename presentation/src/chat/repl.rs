//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::view::terminal::TerminalView;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::io;
use std::path::PathBuf;
use streamchat_application::{ChatSession, ChatTransport, SendOutcome, TurnOutcome};
use tracing::{debug, warn};

const HISTORY_CAPACITY: usize = 1000;

/// What the REPL should do with a line of input.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Message(&'a str),
    Help,
    History,
    Quit,
    Unknown(&'a str),
    Nothing,
}

impl<'a> ReplCommand<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Nothing;
        }
        if !line.starts_with('/') {
            return ReplCommand::Message(line);
        }
        match line {
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/history" => ReplCommand::History,
            other => ReplCommand::Unknown(other),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl<T: ChatTransport + 'static> {
    session: ChatSession<T, TerminalView>,
    history_file: Option<PathBuf>,
    streaming: bool,
}

impl<T: ChatTransport + 'static> ChatRepl<T> {
    pub fn new(session: ChatSession<T, TerminalView>) -> Self {
        Self {
            session,
            history_file: None,
            streaming: true,
        }
    }

    /// Persist line-editor history to this file
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    /// Stream replies (default) or wait for the whole reply
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.history_file else {
            return editor;
        };

        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("Could not open history file {}: {}", path.display(), e);
                editor
            }
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> io::Result<()> {
        let mut editor = self.editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("streamchat".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => match ReplCommand::parse(&line) {
                    ReplCommand::Nothing => continue,
                    ReplCommand::Message(text) => self.process_message(text).await,
                    ReplCommand::Help => Self::print_help(),
                    ReplCommand::History => {
                        print!("{}", ConsoleFormatter::format_history(self.session.history()));
                    }
                    ReplCommand::Unknown(cmd) => {
                        println!("Unknown command: {}", cmd);
                        println!("Type /help for available commands");
                    }
                    ReplCommand::Quit => {
                        println!("Bye!");
                        break;
                    }
                },
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                _ => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::header("streamchat"));
        println!();
        println!("Model: {}", self.session.params().model);
        Self::print_help();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?    - Show this help");
        println!("  /history         - Show the conversation so far");
        println!("  /quit, /exit, /q - Exit chat");
        println!();
        println!("Press Ctrl-C while waiting for a reply to stop it.");
        println!();
    }

    async fn process_message(&mut self, text: &str) {
        let outcome = self.run_turn(text, ctrl_c()).await;
        debug!("Turn finished: {:?}", outcome);

        match outcome {
            TurnOutcome::Cancelled => println!("{}", ConsoleFormatter::format_cancelled()),
            TurnOutcome::ReadFailed(e) => {
                eprintln!("{}", ConsoleFormatter::format_error(&e.to_string()))
            }
            _ => {}
        }
        println!();
    }

    /// Run one turn, abandoning it as soon as `interrupt` resolves.
    ///
    /// Covers the whole turn: waiting for response headers, the stream
    /// itself, and non-streaming requests.
    async fn run_turn(&mut self, text: &str, interrupt: impl Future<Output = ()>) -> TurnOutcome {
        let finished = {
            let turn = self.turn(text);
            // Turn first, so an interrupt already pending still finds the
            // turn started and cancels it.
            tokio::select! {
                biased;
                outcome = turn => Some(outcome),
                () = interrupt => None,
            }
        };

        match finished {
            Some(outcome) => outcome,
            None => {
                self.session.cancel();
                TurnOutcome::Cancelled
            }
        }
    }

    async fn turn(&mut self, text: &str) -> TurnOutcome {
        if !self.streaming {
            return self.session.send_message_unary(text).await;
        }
        match self.session.send_message(text).await {
            SendOutcome::Streaming(_) => self.session.consume_stream().await,
            SendOutcome::Failed(e) => TurnOutcome::TransportFailed(e),
            SendOutcome::Ignored => TurnOutcome::Ignored,
        }
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
