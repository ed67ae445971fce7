//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("Unknown target mode: {0}")]
    UnknownTarget(String),
}
