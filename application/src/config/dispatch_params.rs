//! Dispatch parameters — how a query reaches the backends.
//!
//! [`DispatchParams`] groups the static parameters that control the
//! [`DispatchService`](crate::use_cases::dispatch::DispatchService).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How "all models" mode is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateStrategy {
    /// One call to the aggregate endpoint; the backend fans out and may
    /// attach a dataset match.
    #[default]
    Remote,
    /// Concurrent calls to each single-model endpoint from this client.
    /// No dataset match is available in this mode.
    FanOut,
}

impl AggregateStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateStrategy::Remote => "remote",
            AggregateStrategy::FanOut => "fan_out",
        }
    }
}

impl std::str::FromStr for AggregateStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(AggregateStrategy::Remote),
            "fan_out" | "fan-out" | "fanout" => Ok(AggregateStrategy::FanOut),
            other => Err(format!("unknown aggregate strategy: {}", other)),
        }
    }
}

/// Dispatch control parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchParams {
    /// Strategy for "all models" queries.
    pub aggregate: AggregateStrategy,
    /// Upper bound on one whole dispatch, retries included.
    pub deadline: Option<Duration>,
}

impl DispatchParams {
    pub fn with_aggregate(mut self, aggregate: AggregateStrategy) -> Self {
        self.aggregate = aggregate;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}
