//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface over a chat session.

mod repl;

pub use repl::{ChatRepl, ReplCommand};
