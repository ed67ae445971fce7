//! Domain layer for llm-switchboard
//!
//! This crate contains the core types of the dispatch layer: what a user asks,
//! what each backend answers, and the messages a front-end renders.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Backend**: one of the three remote model endpoints (llama3, mixtral, tinyllama)
//! - **Target mode**: a single backend, or all of them through the aggregate endpoint
//! - **Reply**: a backend's answer or failure, always a value and never an exception
//! - **Dataset match**: a precomputed answer the aggregate endpoint may attach

pub mod config;
pub mod conversation;
pub mod core;
pub mod reply;

// Re-export commonly used types
pub use config::OutputFormat;
pub use conversation::{
    entities::{Conversation, message_id},
    message::{DisplayMessage, MessageMeta, Role},
};
pub use core::{
    backend::Backend,
    error::DomainError,
    query::{Query, TargetMode},
};
pub use reply::value_objects::{
    AggregateResult, DatasetMatch, DispatchResult, MISSING_REPLY, ModelReply,
};
