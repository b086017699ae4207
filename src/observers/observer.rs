//! # Error observation hook.
//!
//! Every handler invocation is isolated: errors and panics are caught by the
//! bus and reported here instead of propagating to the poster or aborting
//! sibling deliveries. `Main`, `Async`, and `Background` failures happen off
//! the posting call stack by construction, so a hook is the only place they
//! can surface; `Posting` failures go through the same hook for a uniform
//! contract.

use async_trait::async_trait;

use crate::error::HandlerFailure;

/// Observer for failed handler invocations.
///
/// Called from whichever execution context ran the handler (posting task,
/// lane worker, or spawned task). Implementations should avoid blocking the
/// runtime; slow sinks belong behind async I/O.
#[async_trait]
pub trait ErrorObserver: Send + Sync + 'static {
    /// Observe one handler failure.
    ///
    /// Never called for successful invocations.
    async fn on_handler_failure(&self, failure: &HandlerFailure);
}
