//! Application-level configuration.
//!
//! - [`DispatchParams`] — aggregate strategy and per-dispatch deadline

pub mod dispatch_params;

pub use dispatch_params::{AggregateStrategy, DispatchParams};
