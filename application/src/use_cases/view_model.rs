//! View model adapter
//!
//! Flattens dispatch results into display-ready messages. This is the only
//! place [`DisplayMessage`] records are created.

use chrono::{DateTime, Utc};
use switchboard_domain::{
    DatasetMatch, DispatchResult, DisplayMessage, MessageMeta, ModelReply, Query, message_id,
};

/// Label used for dataset-matched answers
pub const DATASET_LABEL: &str = "Dataset Match";

/// Content of an error message whose reply carried no error text
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while fetching the response.";

/// Maps queries and dispatch results to [`DisplayMessage`] records.
pub struct ViewModelAdapter;

impl ViewModelAdapter {
    /// The message echoing what the user asked
    pub fn user_message(turn: u64, query: &Query, timestamp: DateTime<Utc>) -> DisplayMessage {
        DisplayMessage::user(message_id(turn, "user"), query.text(), timestamp)
    }

    /// Assistant messages for a dispatch result.
    ///
    /// Single mode yields exactly one message. Aggregate mode yields the
    /// dataset match (if any) followed by one message per backend in
    /// canonical order.
    pub fn assistant_messages(
        turn: u64,
        result: &DispatchResult,
        timestamp: DateTime<Utc>,
    ) -> Vec<DisplayMessage> {
        match result {
            DispatchResult::Single(reply) => vec![Self::reply_message(turn, reply, timestamp)],
            DispatchResult::Aggregate(aggregate) => aggregate
                .dataset_match()
                .map(|dataset| Self::dataset_message(turn, dataset, timestamp))
                .into_iter()
                .chain(
                    aggregate
                        .replies()
                        .iter()
                        .map(|reply| Self::reply_message(turn, reply, timestamp)),
                )
                .collect(),
        }
    }

    /// The user message followed by the assistant messages for one turn
    pub fn to_messages(
        turn: u64,
        query: &Query,
        result: &DispatchResult,
        timestamp: DateTime<Utc>,
    ) -> Vec<DisplayMessage> {
        let mut messages = vec![Self::user_message(turn, query, timestamp)];
        messages.extend(Self::assistant_messages(turn, result, timestamp));
        messages
    }

    fn reply_message(turn: u64, reply: &ModelReply, timestamp: DateTime<Utc>) -> DisplayMessage {
        let id = message_id(turn, reply.model().as_str());
        let label = Some(reply.model().as_str().to_string());
        match reply.text() {
            Some(text) if reply.is_success() => DisplayMessage::assistant(id, label, text, timestamp),
            _ => DisplayMessage::error(
                id,
                label,
                reply.error().unwrap_or(GENERIC_ERROR_MESSAGE),
                timestamp,
            ),
        }
    }

    fn dataset_message(
        turn: u64,
        dataset: &DatasetMatch,
        timestamp: DateTime<Utc>,
    ) -> DisplayMessage {
        let id = message_id(turn, "dataset");
        let label = Some(DATASET_LABEL.to_string());
        let message = match dataset.text() {
            Some(text) if dataset.is_success() => {
                DisplayMessage::assistant(id, label, text, timestamp)
            }
            _ => DisplayMessage::error(
                id,
                label,
                dataset.error().unwrap_or(GENERIC_ERROR_MESSAGE),
                timestamp,
            ),
        };
        message.with_meta(MessageMeta {
            intent: dataset.intent().to_string(),
            source: dataset.source().to_string(),
        })
    }
}
