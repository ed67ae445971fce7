//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod chat_session;
pub mod dispatch;
pub mod view_model;

#[cfg(test)]
pub(crate) mod test_support;
