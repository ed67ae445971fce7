//! Error types for the HTTP backend adapter

use switchboard_application::GatewayError;
use thiserror::Error;

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur when talking to a backend over HTTP
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced an HTTP status
    #[error("No response from {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("HTTP {status} from {url}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl BackendError {
    /// Whether another attempt may succeed: no status was produced, or the
    /// backend reported a server-side (5xx) failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Network { .. } => true,
            BackendError::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<BackendError> for GatewayError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Http { status, .. } => GatewayError::Http { status },
            BackendError::Decode { reason, .. } => GatewayError::Decode(reason),
            BackendError::Network { url, reason } => {
                GatewayError::Network(format!("{} ({})", url, reason))
            }
            other @ (BackendError::InvalidUrl { .. } | BackendError::Client(_)) => {
                GatewayError::Network(other.to_string())
            }
        }
    }
}
