//! HTTP backend adapter
//!
//! Implements [`ChatGateway`](switchboard_application::ChatGateway) over the
//! backends' JSON-over-HTTP API.

pub mod error;
pub mod gateway;
pub mod protocol;
pub mod retry;
pub mod transport;
