//! Default observer: structured logging of handler failures.

use async_trait::async_trait;

use crate::error::HandlerFailure;

use super::ErrorObserver;

/// Logs every handler failure at error level via `tracing`.
///
/// The default observer for buses built without an explicit hook. A failing
/// handler is a local bug, not a bus outage; making it loud in the logs is
/// the whole job.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

#[async_trait]
impl ErrorObserver for LogObserver {
    async fn on_handler_failure(&self, failure: &HandlerFailure) {
        tracing::error!(
            seq = failure.seq,
            subscriber = failure.subscriber,
            target = %failure.target,
            mode = ?failure.mode,
            label = failure.reason.as_label(),
            "{}",
            failure.reason,
        );
    }
}
