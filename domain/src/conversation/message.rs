//! Display messages - the records a presentation layer renders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Provenance of a dataset-matched answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMeta {
    pub intent: String,
    pub source: String,
}

/// A single renderable chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub id: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_label: Option<String>,
    pub content: String,
    pub is_error: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MessageMeta>,
}

impl DisplayMessage {
    /// A message typed by the user
    pub fn user(id: impl Into<String>, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            model_label: None,
            content: content.into(),
            is_error: false,
            timestamp,
            meta: None,
        }
    }

    /// A successful assistant message
    pub fn assistant(
        id: impl Into<String>,
        model_label: Option<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            model_label,
            content: content.into(),
            is_error: false,
            timestamp,
            meta: None,
        }
    }

    /// An assistant message reporting a failure
    pub fn error(
        id: impl Into<String>,
        model_label: Option<String>,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            is_error: true,
            ..Self::assistant(id, model_label, content, timestamp)
        }
    }

    pub fn with_meta(mut self, meta: MessageMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
