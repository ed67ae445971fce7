//! Application layer for llm-switchboard
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AggregateStrategy, DispatchParams};
pub use ports::{
    chat_gateway::{ChatGateway, GatewayError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{DispatchProgress, NoProgress},
};
pub use use_cases::chat_session::ChatSession;
pub use use_cases::dispatch::{
    DECODE_FAILURE_MESSAGE, DispatchError, DispatchService, failure_message,
};
pub use use_cases::view_model::{DATASET_LABEL, GENERIC_ERROR_MESSAGE, ViewModelAdapter};
