//! Progress notification port
//!
//! Defines the interface for reporting progress while a query is in flight.

use switchboard_domain::{Backend, TargetMode};

/// Callback for progress updates during a dispatch
///
/// Implementations live in the presentation layer (spinner, plain text, ...).
pub trait DispatchProgress: Send + Sync {
    /// Called before the first request is issued
    fn on_dispatch_start(&self, target: &TargetMode, backends: usize);

    /// Called once per backend reply, in arrival order
    fn on_reply(&self, backend: Backend, success: bool);

    /// Called when the dispatch has produced its result
    fn on_dispatch_complete(&self, target: &TargetMode);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DispatchProgress for NoProgress {
    fn on_dispatch_start(&self, _target: &TargetMode, _backends: usize) {}
    fn on_reply(&self, _backend: Backend, _success: bool) {}
    fn on_dispatch_complete(&self, _target: &TargetMode) {}
}
