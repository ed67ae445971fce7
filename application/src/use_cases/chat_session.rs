//! Chat session use case
//!
//! Owns one conversation: submits queries through the dispatch service and
//! appends the resulting messages. A new submission supersedes (cancels)
//! the one still in flight, and superseded calls append nothing.

use crate::ports::chat_gateway::ChatGateway;
use crate::ports::progress::DispatchProgress;
use crate::use_cases::dispatch::{DispatchError, DispatchService};
use crate::use_cases::view_model::ViewModelAdapter;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard, PoisonError};
use switchboard_domain::{Conversation, DisplayMessage, Query};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A single local conversation
pub struct ChatSession<G: ChatGateway + 'static> {
    dispatch: DispatchService<G>,
    conversation: Mutex<Conversation>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl<G: ChatGateway + 'static> ChatSession<G> {
    pub fn new(dispatch: DispatchService<G>) -> Self {
        Self {
            dispatch,
            conversation: Mutex::new(Conversation::new()),
            in_flight: Mutex::new(None),
        }
    }

    pub fn dispatch_service(&self) -> &DispatchService<G> {
        &self.dispatch
    }

    /// Submit a query and return the assistant messages it produced.
    ///
    /// The user message is appended immediately. The assistant messages are
    /// appended once the dispatch completes, unless this call was cancelled
    /// or superseded first.
    pub async fn submit(
        &self,
        query: Query,
        progress: &dyn DispatchProgress,
    ) -> Result<Vec<DisplayMessage>, DispatchError> {
        let token = CancellationToken::new();
        {
            let mut slot = self.lock_in_flight();
            if let Some(previous) = slot.replace(token.clone()) {
                debug!("Superseding the query still in flight");
                previous.cancel();
            }
        }

        let turn = {
            let mut conversation = self.lock_conversation();
            let turn = conversation.next_turn();
            conversation.append(ViewModelAdapter::user_message(turn, &query, Utc::now()));
            turn
        };

        let outcome = self.dispatch.dispatch(&query, progress, &token).await;

        {
            let mut slot = self.lock_in_flight();
            // An uncancelled token is still the one in the slot
            if token.is_cancelled() {
                return Err(DispatchError::Cancelled);
            }
            slot.take();
        }

        let result = outcome?;
        let messages = ViewModelAdapter::assistant_messages(turn, &result, Utc::now());
        self.lock_conversation().extend(messages.clone());
        Ok(messages)
    }

    /// Cancel the query in flight, if any. Returns whether one was cancelled.
    pub fn cancel(&self) -> bool {
        match self.lock_in_flight().take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether a submission is still waiting on the backends
    pub fn is_busy(&self) -> bool {
        self.lock_in_flight().is_some()
    }

    /// Snapshot of every message so far
    pub fn messages(&self) -> Vec<DisplayMessage> {
        self.lock_conversation().messages().to_vec()
    }

    pub fn turns(&self) -> u64 {
        self.lock_conversation().turns()
    }

    fn lock_conversation(&self) -> MutexGuard<'_, Conversation> {
        self.conversation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
