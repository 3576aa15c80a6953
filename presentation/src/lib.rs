//! Presentation layer for streamchat
//!
//! This crate contains the CLI definition, the terminal implementation of
//! the chat view, output formatting and the interactive REPL.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;
pub mod view;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use output::console::ConsoleFormatter;
pub use progress::typing::TypingIndicator;
pub use view::terminal::TerminalView;
