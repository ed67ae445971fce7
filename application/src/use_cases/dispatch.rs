//! Dispatch use case
//!
//! Routes a query to one backend or to all of them, and turns every remote
//! failure into a reply value. Callers never handle errors for expected
//! backend problems; the only error a dispatch reports is cancellation.

use crate::config::{AggregateStrategy, DispatchParams};
use crate::ports::chat_gateway::{ChatGateway, GatewayError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{DispatchProgress, NoProgress};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use switchboard_domain::{
    AggregateResult, Backend, DatasetMatch, DispatchResult, ModelReply, Query, TargetMode,
};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shown to the user when a backend answered with something unreadable
pub const DECODE_FAILURE_MESSAGE: &str = "Received an unexpected response from the backend.";

/// Shown for a backend whose request task died before replying
pub const TASK_FAILURE_MESSAGE: &str = "The request to this model failed unexpectedly.";

/// Errors a dispatch can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Dispatch cancelled")]
    Cancelled,
}

impl DispatchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DispatchError::Cancelled)
    }
}

/// User-facing text for a gateway failure.
pub fn failure_message(error: &GatewayError) -> String {
    match error {
        GatewayError::Network(detail) => format!("Could not reach the backend: {}", detail),
        GatewayError::Http { status } => format!("The backend returned HTTP {}", status),
        GatewayError::Decode(_) => DECODE_FAILURE_MESSAGE.to_string(),
    }
}

async fn within_deadline<T>(
    deadline: Option<Duration>,
    call: impl Future<Output = Result<T, GatewayError>>,
) -> Result<T, GatewayError> {
    match deadline {
        Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
            Err(GatewayError::Network(format!(
                "no reply within {} ms",
                limit.as_millis()
            )))
        }),
        None => call.await,
    }
}

/// Use case for dispatching queries to the model backends
pub struct DispatchService<G: ChatGateway + 'static> {
    gateway: Arc<G>,
    params: DispatchParams,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: ChatGateway + 'static> DispatchService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            params: DispatchParams::default(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_params(mut self, params: DispatchParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn params(&self) -> &DispatchParams {
        &self.params
    }

    /// Ask one backend. Always resolves to a reply.
    pub async fn query_one(&self, backend: Backend, text: &str) -> ModelReply {
        self.query_one_with_progress(backend, text, &NoProgress).await
    }

    /// Ask every backend. Always resolves to a result with three replies.
    pub async fn query_all(&self, text: &str) -> AggregateResult {
        self.query_all_with_progress(text, &NoProgress).await
    }

    /// Dispatch a query according to its target mode.
    ///
    /// Resolves to `Err(DispatchError::Cancelled)` only if `cancellation`
    /// fires before the result is ready; the partial work is dropped.
    pub async fn dispatch(
        &self,
        query: &Query,
        progress: &dyn DispatchProgress,
        cancellation: &CancellationToken,
    ) -> Result<DispatchResult, DispatchError> {
        let target = query.target();
        if cancellation.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        info!("Dispatching query to {}", target);
        self.logger.log(ConversationEvent::new(
            "query_submitted",
            json!({
                "target": target.to_string(),
                "input": query.text(),
            }),
        ));
        progress.on_dispatch_start(&target, target.backends().len());

        let run = async {
            match target {
                TargetMode::Single(backend) => DispatchResult::Single(
                    self.query_one_with_progress(backend, query.text(), progress)
                        .await,
                ),
                TargetMode::All => DispatchResult::Aggregate(
                    self.query_all_with_progress(query.text(), progress).await,
                ),
            }
        };

        let result = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                info!("Dispatch to {} cancelled", target);
                self.logger.log(ConversationEvent::new(
                    "dispatch_cancelled",
                    json!({ "target": target.to_string() }),
                ));
                return Err(DispatchError::Cancelled);
            }
            result = run => result,
        };

        progress.on_dispatch_complete(&target);
        Ok(result)
    }

    async fn query_one_with_progress(
        &self,
        backend: Backend,
        text: &str,
        progress: &dyn DispatchProgress,
    ) -> ModelReply {
        let call = self.gateway.ask_model(backend, text);
        let reply = match within_deadline(self.params.deadline, call).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Backend {} failed: {}", backend, e);
                self.log_failure(&TargetMode::Single(backend), &e);
                ModelReply::failure(backend, failure_message(&e))
            }
        };

        progress.on_reply(backend, reply.is_success());
        self.log_reply(&reply);
        reply
    }

    async fn query_all_with_progress(
        &self,
        text: &str,
        progress: &dyn DispatchProgress,
    ) -> AggregateResult {
        match self.params.aggregate {
            AggregateStrategy::Remote => {
                let result = self.query_all_remote(text).await;
                if let Some(dataset) = result.dataset_match() {
                    self.log_dataset(dataset);
                }
                for reply in result.replies() {
                    progress.on_reply(reply.model(), reply.is_success());
                    self.log_reply(reply);
                }
                result
            }
            AggregateStrategy::FanOut => self.query_all_fan_out(text, progress).await,
        }
    }

    /// One call to the aggregate endpoint
    async fn query_all_remote(&self, text: &str) -> AggregateResult {
        let call = self.gateway.ask_all(text);
        match within_deadline(self.params.deadline, call).await {
            Ok(result) => {
                debug!(
                    "Aggregate endpoint answered: {} of {} backends succeeded",
                    result.successful_replies().count(),
                    result.replies().len()
                );
                result
            }
            Err(e) => {
                warn!("Aggregate query failed: {}", e);
                self.log_failure(&TargetMode::All, &e);
                AggregateResult::all_failed(failure_message(&e))
            }
        }
    }

    /// Concurrent calls to each single-model endpoint
    async fn query_all_fan_out(
        &self,
        text: &str,
        progress: &dyn DispatchProgress,
    ) -> AggregateResult {
        let mut join_set = JoinSet::new();

        for backend in Backend::ALL {
            let gateway = Arc::clone(&self.gateway);
            let input = text.to_string();
            let deadline = self.params.deadline;

            join_set.spawn(async move {
                let result = within_deadline(deadline, gateway.ask_model(backend, &input)).await;
                (backend, result)
            });
        }

        let mut replies = Vec::with_capacity(Backend::ALL.len());

        while let Some(joined) = join_set.join_next().await {
            let reply = match joined {
                Ok((backend, Ok(reply))) => {
                    debug!("Backend {} replied", backend);
                    reply
                }
                Ok((backend, Err(e))) => {
                    warn!("Backend {} failed: {}", backend, e);
                    self.log_failure(&TargetMode::Single(backend), &e);
                    ModelReply::failure(backend, failure_message(&e))
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                    continue;
                }
            };
            progress.on_reply(reply.model(), reply.is_success());
            self.log_reply(&reply);
            replies.push(reply);
        }

        // A task that panicked never named its backend
        for backend in Backend::ALL {
            if replies.iter().all(|r| r.model() != backend) {
                let reply = ModelReply::failure(backend, TASK_FAILURE_MESSAGE);
                progress.on_reply(backend, false);
                self.log_reply(&reply);
                replies.push(reply);
            }
        }

        AggregateResult::new(None, replies)
    }

    fn log_reply(&self, reply: &ModelReply) {
        self.logger.log(ConversationEvent::new(
            "model_reply",
            json!({
                "model": reply.model().as_str(),
                "success": reply.is_success(),
                "bytes": reply.text().map(str::len).unwrap_or(0),
                "error": reply.error(),
            }),
        ));
    }

    fn log_dataset(&self, dataset: &DatasetMatch) {
        self.logger.log(ConversationEvent::new(
            "dataset_match",
            json!({
                "intent": dataset.intent(),
                "source": dataset.source(),
                "success": dataset.is_success(),
            }),
        ));
    }

    fn log_failure(&self, target: &TargetMode, error: &GatewayError) {
        self.logger.log(ConversationEvent::new(
            "dispatch_failed",
            json!({
                "target": target.to_string(),
                "error": error.to_string(),
            }),
        ));
    }
}
