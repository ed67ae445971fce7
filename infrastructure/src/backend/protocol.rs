//! Wire types for the backends' JSON API.
//!
//! Every payload is decoded once, here, into typed structs and then mapped
//! to domain values. Nothing downstream inspects raw JSON.
//!
//! # Endpoints
//!
//! - `POST /api/{llama3,mixtral,tinyllama}` with [`ChatRequest`] →
//!   [`SingleModelPayload`]
//! - `POST /api/chat` with [`ChatRequest`] → [`AggregatePayload`]
//!
//! # Aggregate payload variants
//!
//! The aggregate endpoint has two observed shapes. The canonical one carries
//! a `models` map and an optional dataset match; the legacy one carries a
//! `responses` map of plain strings. Each variant has its own required
//! field, which is what tells them apart.
//!
//! Inside a variant, entries are decoded one by one: a malformed entry
//! fails only the backend it belongs to.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use switchboard_domain::{AggregateResult, Backend, DatasetMatch, ModelReply};
use tracing::{debug, warn};

/// Path of the aggregate endpoint
pub const AGGREGATE_ENDPOINT: &str = "/api/chat";

/// Error text for a model that reported failure without saying why
pub const MODEL_FAILURE: &str = "The model could not generate a response";

/// Error text for a model that reported success but sent no text
pub const EMPTY_RESPONSE: &str = "The model returned an empty response";

/// Error text for a dataset entry that reported failure without a response
pub const DATASET_FAILURE: &str = "No dataset answer available";

/// Error text for an aggregate entry whose shape could not be read
pub const MALFORMED_ENTRY: &str = "The model's reply could not be read";

/// Request body shared by every endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub input: &'a str,
}

/// Reply of a single-model endpoint, and of one entry in `models`
#[derive(Debug, Clone, Deserialize)]
pub struct SingleModelPayload {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SingleModelPayload {
    pub fn into_reply(self, backend: Backend) -> ModelReply {
        match (self.success, self.response) {
            (true, Some(text)) => ModelReply::success(backend, text),
            (true, None) => ModelReply::failure(
                backend,
                self.error.unwrap_or_else(|| EMPTY_RESPONSE.to_string()),
            ),
            (false, _) => ModelReply::failure(
                backend,
                self.error.unwrap_or_else(|| MODEL_FAILURE.to_string()),
            ),
        }
    }
}

/// Dataset entry of the canonical aggregate payload
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetPayload {
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub success: bool,
}

impl DatasetPayload {
    /// A failed dataset entry carries its `response` as the error text.
    pub fn into_match(self) -> DatasetMatch {
        match (self.success, self.response) {
            (true, Some(text)) => DatasetMatch::success(self.intent, self.source, text),
            (_, response) => DatasetMatch::failure(
                self.intent,
                self.source,
                response.unwrap_or_else(|| DATASET_FAILURE.to_string()),
            ),
        }
    }
}

/// Canonical aggregate payload
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsPayload {
    /// `null` reads as no match
    #[serde(default)]
    pub dataset_match: Option<bool>,
    #[serde(default)]
    pub dataset: Option<Value>,
    pub models: BTreeMap<String, Value>,
}

/// Legacy aggregate payload
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyPayload {
    pub responses: BTreeMap<String, Value>,
}

/// Reply of the aggregate endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AggregatePayload {
    Models(ModelsPayload),
    Legacy(LegacyPayload),
}

/// Wire keys match exactly; the CLI's aliases do not apply here.
fn known_backend(key: &str) -> Option<Backend> {
    let backend = Backend::ALL.into_iter().find(|b| b.as_str() == key);
    if backend.is_none() {
        debug!("Ignoring reply for unknown backend '{}'", key);
    }
    backend
}

fn model_entry(backend: Backend, value: Value) -> ModelReply {
    match serde_json::from_value::<SingleModelPayload>(value) {
        Ok(payload) => payload.into_reply(backend),
        Err(e) => {
            warn!("Unreadable reply entry for {}: {}", backend, e);
            ModelReply::failure(backend, MALFORMED_ENTRY)
        }
    }
}

fn dataset_entry(value: Value) -> Option<DatasetMatch> {
    match serde_json::from_value::<DatasetPayload>(value) {
        Ok(dataset) => Some(dataset.into_match()),
        Err(e) => {
            warn!("Ignoring unreadable dataset entry: {}", e);
            None
        }
    }
}

fn legacy_entry(backend: Backend, value: Value) -> ModelReply {
    match value {
        Value::String(text) => ModelReply::success(backend, text),
        _ => ModelReply::failure(backend, MODEL_FAILURE),
    }
}

impl AggregatePayload {
    /// Map to a domain result with replies in canonical backend order.
    pub fn into_result(self) -> AggregateResult {
        match self {
            AggregatePayload::Models(payload) => {
                let dataset = if payload.dataset_match.unwrap_or(false) {
                    payload.dataset.and_then(dataset_entry)
                } else {
                    None
                };
                let replies = payload
                    .models
                    .into_iter()
                    .filter_map(|(key, entry)| {
                        known_backend(&key).map(|backend| model_entry(backend, entry))
                    })
                    .collect();
                AggregateResult::new(dataset, replies)
            }
            AggregatePayload::Legacy(payload) => {
                let replies = payload
                    .responses
                    .into_iter()
                    .filter_map(|(key, entry)| {
                        known_backend(&key).map(|backend| legacy_entry(backend, entry))
                    })
                    .collect();
                AggregateResult::new(None, replies)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_domain::MISSING_REPLY;

    fn decode(json: &str) -> AggregateResult {
        serde_json::from_str::<AggregatePayload>(json)
            .unwrap()
            .into_result()
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(ChatRequest { input: "hello" }).unwrap();
        assert_eq!(body, serde_json::json!({ "input": "hello" }));
    }

    #[test]
    fn test_single_model_success() {
        let payload: SingleModelPayload =
            serde_json::from_str(r#"{"success": true, "response": "Hi!"}"#).unwrap();
        let reply = payload.into_reply(Backend::Llama3);
        assert_eq!(reply, ModelReply::success(Backend::Llama3, "Hi!"));
    }

    #[test]
    fn test_single_model_failure_without_error_text() {
        let payload: SingleModelPayload =
            serde_json::from_str(r#"{"success": false, "response": null}"#).unwrap();
        let reply = payload.into_reply(Backend::Mixtral);
        assert!(!reply.is_success());
        assert_eq!(reply.error(), Some(MODEL_FAILURE));
    }

    #[test]
    fn test_single_model_success_without_text_is_failure() {
        let payload: SingleModelPayload =
            serde_json::from_str(r#"{"success": true, "response": null}"#).unwrap();
        let reply = payload.into_reply(Backend::TinyLlama);
        assert_eq!(reply.error(), Some(EMPTY_RESPONSE));
        assert!(reply.text().is_none());
    }

    #[test]
    fn test_canonical_payload_orders_models() {
        let result = decode(
            r#"{
                "success": true,
                "dataset_match": true,
                "dataset": {
                    "intent": "deductible_definition",
                    "source": "insurance_faq",
                    "response": "A deductible is what you pay first.",
                    "success": true
                },
                "models": {
                    "tinyllama": {"success": true, "response": "c"},
                    "llama3": {"success": true, "response": "a"},
                    "mixtral": {"success": false, "response": null, "error": "model overloaded"}
                }
            }"#,
        );

        let dataset = result.dataset_match().unwrap();
        assert_eq!(dataset.intent(), "deductible_definition");
        assert_eq!(dataset.text(), Some("A deductible is what you pay first."));

        let order: Vec<_> = result.replies().iter().map(|r| r.model()).collect();
        assert_eq!(order, Backend::ALL.to_vec());
        assert_eq!(result.reply_for(Backend::Llama3).text(), Some("a"));
        assert_eq!(
            result.reply_for(Backend::Mixtral).error(),
            Some("model overloaded")
        );
    }

    #[test]
    fn test_dataset_ignored_without_match_flag() {
        let result = decode(
            r#"{
                "success": true,
                "dataset_match": false,
                "dataset": {"intent": "x", "source": "y", "response": "z", "success": true},
                "models": {}
            }"#,
        );
        assert!(result.dataset_match().is_none());
        assert!(result.replies().iter().all(|r| r.error() == Some(MISSING_REPLY)));
    }

    #[test]
    fn test_failed_dataset_carries_response_as_error() {
        let result = decode(
            r#"{
                "success": true,
                "dataset_match": true,
                "dataset": {"intent": "x", "source": "y", "response": "lookup failed", "success": false},
                "models": {}
            }"#,
        );
        let dataset = result.dataset_match().unwrap();
        assert!(!dataset.is_success());
        assert_eq!(dataset.error(), Some("lookup failed"));
    }

    #[test]
    fn test_legacy_payload() {
        let result = decode(
            r#"{
                "success": true,
                "responses": {"mixtral": "b", "llama3": "a", "tinyllama": null}
            }"#,
        );
        assert!(result.dataset_match().is_none());
        assert_eq!(result.reply_for(Backend::Llama3).text(), Some("a"));
        assert_eq!(result.reply_for(Backend::Mixtral).text(), Some("b"));
        assert_eq!(result.reply_for(Backend::TinyLlama).error(), Some(MODEL_FAILURE));
    }

    #[test]
    fn test_unknown_model_keys_are_ignored() {
        let result = decode(
            r#"{"models": {"gpt4": {"success": true, "response": "?"}, "llama3": {"success": true, "response": "a"}}}"#,
        );
        assert_eq!(result.successful_replies().count(), 1);
    }

    #[test]
    fn test_null_dataset_match_keeps_model_replies() {
        let result = decode(
            r#"{
                "dataset_match": null,
                "models": {
                    "llama3": {"success": true, "response": "a"},
                    "mixtral": {"success": true, "response": "b"},
                    "tinyllama": {"success": true, "response": "c"}
                }
            }"#,
        );
        assert!(result.dataset_match().is_none());
        assert_eq!(result.successful_replies().count(), 3);
    }

    #[test]
    fn test_malformed_entry_fails_only_its_backend() {
        let result = decode(
            r#"{
                "models": {
                    "llama3": {"response": "a"},
                    "mixtral": {"success": true, "response": "b"},
                    "tinyllama": {"success": true, "response": 42}
                }
            }"#,
        );
        assert_eq!(result.reply_for(Backend::Llama3).error(), Some(MODEL_FAILURE));
        assert_eq!(result.reply_for(Backend::Mixtral).text(), Some("b"));
        assert_eq!(
            result.reply_for(Backend::TinyLlama).error(),
            Some(MALFORMED_ENTRY)
        );
    }

    #[test]
    fn test_unreadable_dataset_is_dropped() {
        let result = decode(
            r#"{
                "dataset_match": true,
                "dataset": "not an object",
                "models": {"llama3": {"success": true, "response": "a"}}
            }"#,
        );
        assert!(result.dataset_match().is_none());
        assert_eq!(result.reply_for(Backend::Llama3).text(), Some("a"));
    }

    #[test]
    fn test_alias_keys_do_not_shadow_wire_keys() {
        let result = decode(
            r#"{
                "models": {
                    "llama": {"success": true, "response": "alias"},
                    "llama3": {"success": true, "response": "real"},
                    "tiny": {"success": true, "response": "alias"}
                }
            }"#,
        );
        assert_eq!(result.reply_for(Backend::Llama3).text(), Some("real"));
        assert_eq!(
            result.reply_for(Backend::TinyLlama).error(),
            Some(MISSING_REPLY)
        );
    }

    #[test]
    fn test_payload_without_discriminating_field_is_rejected() {
        let result = serde_json::from_str::<AggregatePayload>(r#"{"success": true}"#);
        assert!(result.is_err());
    }
}
