//! Infrastructure layer for llm-switchboard
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP backend gateway, configuration
//! file loading and the JSONL conversation transcript.

pub mod backend;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use backend::{
    error::{BackendError, Result},
    gateway::HttpChatGateway,
    retry::RetryPolicy,
    transport::{DEFAULT_BASE_URL, HttpTransport, HttpTransportConfig, RawResponse},
};
pub use config::{
    ConfigLoader, ConfigValidationError, FileBackendConfig, FileConfig, FileDispatchConfig,
    FileLoggingConfig, FileOutputConfig, FileReplConfig, FileRetryConfig,
};
pub use logging::JsonlConversationLogger;
