//! Interactive chat module
//!
//! Provides a line-editor based chat loop on top of [`ChatSession`](streamchat_application::ChatSession).

mod repl;

pub use repl::ChatRepl;
