//! Conversation domain: display-ready messages and the append-only transcript.

pub mod entities;
pub mod message;
