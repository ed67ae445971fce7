//! Conversation entity - the append-only message transcript.

use super::message::DisplayMessage;

/// One local conversation.
///
/// Messages are only ever appended. Each submitted query opens a new turn;
/// message ids are `"{turn}-{suffix}"` so they stay unique within the
/// conversation without relying on wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<DisplayMessage>,
    turns: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new turn and returns its number (1-based).
    pub fn next_turn(&mut self) -> u64 {
        self.turns += 1;
        self.turns
    }

    pub fn append(&mut self, message: DisplayMessage) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = DisplayMessage>) {
        self.messages.extend(messages);
    }

    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn turns(&self) -> u64 {
        self.turns
    }
}

/// Builds the id of a message within a turn.
pub fn message_id(turn: u64, suffix: &str) -> String {
    format!("{}-{}", turn, suffix)
}
