//! Test doubles for the application ports.

use crate::ports::chat_gateway::{ChatGateway, GatewayError};
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::progress::DispatchProgress;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use switchboard_domain::{AggregateResult, Backend, ModelReply, TargetMode};

/// Gateway with scripted answers, per-backend latency and call counters.
///
/// Backends without a scripted answer reply successfully with
/// `"<backend> says hi"`.
#[derive(Default)]
pub struct MockGateway {
    model_results: HashMap<Backend, Result<ModelReply, GatewayError>>,
    model_delays: HashMap<Backend, Duration>,
    model_panics: HashSet<Backend>,
    aggregate_result: Option<Result<AggregateResult, GatewayError>>,
    aggregate_delay: Option<Duration>,
    model_calls: AtomicUsize,
    aggregate_calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model_reply(mut self, backend: Backend, reply: ModelReply) -> Self {
        self.model_results.insert(backend, Ok(reply));
        self
    }

    pub fn with_model_error(mut self, backend: Backend, error: GatewayError) -> Self {
        self.model_results.insert(backend, Err(error));
        self
    }

    pub fn with_model_delay(mut self, backend: Backend, delay: Duration) -> Self {
        self.model_delays.insert(backend, delay);
        self
    }

    /// The call for `backend` panics instead of answering
    pub fn with_model_panic(mut self, backend: Backend) -> Self {
        self.model_panics.insert(backend);
        self
    }

    pub fn with_aggregate(mut self, result: AggregateResult) -> Self {
        self.aggregate_result = Some(Ok(result));
        self
    }

    pub fn with_aggregate_error(mut self, error: GatewayError) -> Self {
        self.aggregate_result = Some(Err(error));
        self
    }

    pub fn with_aggregate_delay(mut self, delay: Duration) -> Self {
        self.aggregate_delay = Some(delay);
        self
    }

    pub fn model_calls(&self) -> usize {
        self.model_calls.load(Ordering::SeqCst)
    }

    pub fn aggregate_calls(&self) -> usize {
        self.aggregate_calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    fn default_reply(backend: Backend) -> ModelReply {
        ModelReply::success(backend, format!("{} says hi", backend))
    }
}

#[async_trait]
impl ChatGateway for MockGateway {
    async fn ask_model(&self, backend: Backend, input: &str) -> Result<ModelReply, GatewayError> {
        self.model_calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(input.to_string());
        if let Some(delay) = self.model_delays.get(&backend) {
            tokio::time::sleep(*delay).await;
        }
        if self.model_panics.contains(&backend) {
            panic!("scripted panic for {}", backend);
        }
        self.model_results
            .get(&backend)
            .cloned()
            .unwrap_or_else(|| Ok(Self::default_reply(backend)))
    }

    async fn ask_all(&self, input: &str) -> Result<AggregateResult, GatewayError> {
        self.aggregate_calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(input.to_string());
        if let Some(delay) = self.aggregate_delay {
            tokio::time::sleep(delay).await;
        }
        self.aggregate_result.clone().unwrap_or_else(|| {
            Ok(AggregateResult::new(
                None,
                Backend::ALL.iter().map(|b| Self::default_reply(*b)).collect(),
            ))
        })
    }
}

/// Progress notifier that records what it was told.
#[derive(Default)]
pub struct RecordingProgress {
    started: AtomicUsize,
    completed: AtomicUsize,
    replies: Mutex<Vec<Backend>>,
}

impl RecordingProgress {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn replies(&self) -> Vec<Backend> {
        self.replies.lock().unwrap().clone()
    }
}

impl DispatchProgress for RecordingProgress {
    fn on_dispatch_start(&self, _target: &TargetMode, _backends: usize) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_reply(&self, backend: Backend, _success: bool) {
        self.replies.lock().unwrap().push(backend);
    }

    fn on_dispatch_complete(&self, _target: &TargetMode) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Conversation logger that keeps events in memory.
#[derive(Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<(&'static str, serde_json::Value)>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type, event.payload));
    }
}
