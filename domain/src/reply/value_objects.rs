//! Reply value objects - immutable result types produced by a dispatch.
//!
//! - [`ModelReply`] - one backend's answer (or failure) to a query
//! - [`DatasetMatch`] - precomputed answer the aggregate endpoint may attach
//! - [`AggregateResult`] - dataset match plus one reply per backend
//! - [`DispatchResult`] - what a single dispatch produced, by target mode
//!
//! Success and failure are only constructible through named constructors, so
//! a failed reply never carries text and always carries error text.

use crate::core::backend::Backend;
use serde::Serialize;

/// Reply from a single backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelReply {
    model: Backend,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ModelReply {
    /// Creates a successful reply.
    pub fn success(model: Backend, text: impl Into<String>) -> Self {
        Self {
            model,
            success: true,
            text: Some(text.into()),
            error: None,
        }
    }

    /// Creates a failed reply carrying the reason.
    pub fn failure(model: Backend, error: impl Into<String>) -> Self {
        Self {
            model,
            success: false,
            text: None,
            error: Some(error.into()),
        }
    }

    pub fn model(&self) -> Backend {
        self.model
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// A precomputed answer matched from the backend's dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetMatch {
    intent: String,
    source: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DatasetMatch {
    pub fn success(
        intent: impl Into<String>,
        source: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            intent: intent.into(),
            source: source.into(),
            success: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failure(
        intent: impl Into<String>,
        source: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            intent: intent.into(),
            source: source.into(),
            success: false,
            text: None,
            error: Some(error.into()),
        }
    }

    pub fn intent(&self) -> &str {
        &self.intent
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Result of querying every backend at once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    dataset_match: Option<DatasetMatch>,
    replies: Vec<ModelReply>,
}

/// Error text for a backend that the aggregate payload did not mention
pub const MISSING_REPLY: &str = "No response from this model";

impl AggregateResult {
    /// Assembles a result from replies in any arrival order.
    ///
    /// Replies are placed in canonical backend order. A backend with no reply
    /// gets a failure entry; duplicate replies keep the first one received.
    pub fn new(dataset_match: Option<DatasetMatch>, replies: Vec<ModelReply>) -> Self {
        let mut slots: [Option<ModelReply>; 3] = [None, None, None];
        for reply in replies {
            let slot = &mut slots[reply.model().position()];
            if slot.is_none() {
                *slot = Some(reply);
            }
        }

        let replies = Backend::ALL
            .iter()
            .zip(slots)
            .map(|(backend, slot)| slot.unwrap_or_else(|| ModelReply::failure(*backend, MISSING_REPLY)))
            .collect();

        Self {
            dataset_match,
            replies,
        }
    }

    /// Every backend failed with the same reason and no dataset match.
    pub fn all_failed(error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            dataset_match: None,
            replies: Backend::ALL
                .iter()
                .map(|backend| ModelReply::failure(*backend, error.clone()))
                .collect(),
        }
    }

    pub fn dataset_match(&self) -> Option<&DatasetMatch> {
        self.dataset_match.as_ref()
    }

    /// Replies in canonical backend order.
    pub fn replies(&self) -> &[ModelReply] {
        &self.replies
    }

    pub fn reply_for(&self, backend: Backend) -> &ModelReply {
        &self.replies[backend.position()]
    }

    pub fn successful_replies(&self) -> impl Iterator<Item = &ModelReply> {
        self.replies.iter().filter(|r| r.is_success())
    }

    pub fn failed_replies(&self) -> impl Iterator<Item = &ModelReply> {
        self.replies.iter().filter(|r| !r.is_success())
    }
}

/// Outcome of dispatching one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DispatchResult {
    Single(ModelReply),
    Aggregate(AggregateResult),
}
