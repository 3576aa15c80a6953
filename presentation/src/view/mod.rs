//! Terminal rendering of a chat session

pub mod terminal;
