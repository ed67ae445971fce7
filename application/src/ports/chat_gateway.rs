//! Chat Gateway port
//!
//! Defines the interface for reaching the remote model backends.

use async_trait::async_trait;
use switchboard_domain::{AggregateResult, Backend, ModelReply};
use thiserror::Error;

/// Errors that can occur while talking to a backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No HTTP response was received (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// The backend answered 2xx but the body did not match the wire contract
    #[error("Decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn is_network(&self) -> bool {
        matches!(self, GatewayError::Network(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, GatewayError::Decode(_))
    }
}

/// Gateway to the model backends
///
/// Implementations decode the wire payload once and hand back domain values.
/// A backend that answers with `success: false` is an `Ok` failure reply;
/// `Err` is reserved for transport, status and decoding problems.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Ask one backend through its own endpoint
    async fn ask_model(&self, backend: Backend, input: &str) -> Result<ModelReply, GatewayError>;

    /// Ask the aggregate endpoint, which fans out to every backend remotely
    async fn ask_all(&self, input: &str) -> Result<AggregateResult, GatewayError>;
}
