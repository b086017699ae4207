//! # Dispatch engine.
//!
//! Resolves a target key against the registry and routes every matched
//! descriptor to its execution context:
//!
//! ```text
//! post ──► resolve(key) ──► for each descriptor:
//!            │                ├─ Posting    ─► run inline, before post returns
//!            │                ├─ Main       ─► enqueue on the main lane
//!            │                ├─ Async      ─► tokio::spawn (independent task)
//!            │                └─ Background ─► main-lane poster: background lane
//!            │                                 anyone else:      run inline
//!            └─ empty resolve set: valid no-op (fire and forget)
//! ```
//!
//! ## Rules
//! - Every scheduled invocation is stamped with a bus-wide monotonic
//!   sequence number. Stamps record scheduling order, not delivery order:
//!   the stamp and the lane enqueue are separate steps, so two concurrent
//!   posters can be dequeued in the opposite order of their stamps. A
//!   lane always delivers in its own enqueue order.
//! - Each job holds a strong handle to its subscriber, upgraded from the
//!   descriptor's weak reference at resolve time. A dead subscriber is
//!   skipped; a live one stays alive until its already-scheduled invocation
//!   completes, which is the documented unregister race boundary.
//! - Every invocation is isolated: errors and panics are caught, reported
//!   to the error observer, and never abort sibling deliveries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;

use crate::core::config::BusConfig;
use crate::core::lanes::{current_lane, Lane, LaneKind};
use crate::core::registry::{HandlerDescriptor, Registry};
use crate::error::{FailureReason, HandlerFailure};
use crate::events::{Payload, TargetKey};
use crate::observers::ErrorObserver;
use crate::subscribers::{Subscriber, ThreadMode};

/// One scheduled handler invocation.
pub(crate) struct Job {
    /// Monotonic stamp recording scheduling order (not lane delivery order).
    pub(crate) seq: u64,
    pub(crate) descriptor: Arc<HandlerDescriptor>,
    /// Keeps the subscriber alive until the invocation completes.
    pub(crate) owner: Arc<dyn Subscriber>,
    pub(crate) payload: Payload,
}

/// Routes resolved descriptors to their thread-mode execution contexts.
pub(crate) struct Dispatcher {
    registry: Arc<Registry>,
    main: Lane,
    background: Lane,
    observer: Arc<dyn ErrorObserver>,
    seq: AtomicU64,
}

impl Dispatcher {
    /// Spawns both lanes. Must be called from within a tokio runtime.
    pub(crate) fn new(
        registry: Arc<Registry>,
        config: &BusConfig,
        observer: Arc<dyn ErrorObserver>,
    ) -> Self {
        let main = Lane::spawn(
            LaneKind::Main,
            config.name,
            config.bounded_lane_capacity(),
            Arc::clone(&observer),
        );
        let background = Lane::spawn(
            LaneKind::Background,
            config.name,
            config.bounded_lane_capacity(),
            Arc::clone(&observer),
        );
        Self {
            registry,
            main,
            background,
            observer,
            seq: AtomicU64::new(0),
        }
    }

    /// Resolves `key` and discharges one invocation per live descriptor.
    ///
    /// Returns once every `Posting`-mode (and inline `Background`) handler
    /// has completed and every other invocation is enqueued or spawned.
    pub(crate) async fn post(&self, key: TargetKey, payload: Payload) {
        for descriptor in self.registry.resolve(&key) {
            // Resolve already pruned dead descriptors; this upgrade only
            // loses the race against a subscriber dropped mid-resolve.
            let Some(owner) = descriptor.owner.upgrade() else {
                continue;
            };
            let job = Job {
                seq: self.seq.fetch_add(1, Ordering::Relaxed),
                descriptor,
                owner,
                payload: payload.clone(),
            };
            match job.descriptor.mode {
                ThreadMode::Posting => invoke_isolated(job, self.observer.as_ref()).await,
                ThreadMode::Main => self.main.enqueue(job),
                ThreadMode::Async => {
                    let observer = Arc::clone(&self.observer);
                    tokio::spawn(async move {
                        invoke_isolated(job, observer.as_ref()).await;
                    });
                }
                ThreadMode::Background => {
                    if current_lane() == Some(LaneKind::Main) {
                        self.background.enqueue(job);
                    } else {
                        // Already off the main lane: run synchronously with
                        // the poster, no extra indirection.
                        invoke_isolated(job, self.observer.as_ref()).await;
                    }
                }
            }
        }
    }

    /// Closes both lanes and waits for their workers to drain.
    pub(crate) async fn shutdown(self) {
        self.main.shutdown().await;
        self.background.shutdown().await;
    }
}

/// Runs one invocation, catching errors and panics.
///
/// Failures are reported to `observer`; nothing propagates to the caller.
pub(crate) async fn invoke_isolated(job: Job, observer: &dyn ErrorObserver) {
    let Job {
        seq,
        descriptor,
        owner,
        payload,
    } = job;
    // Hold the strong handle across the invocation so the subscriber cannot
    // be freed mid-call.
    let _owner = owner;

    // Sync handlers run while the future is being built, so the closure call
    // itself needs an unwind guard, not just the returned future.
    let built = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        (descriptor.invoke)(payload)
    }));
    let reason = match built {
        Ok(fut) => match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(())) => return,
            Ok(Err(error)) => FailureReason::Error(error.to_string()),
            Err(panic) => FailureReason::Panic(panic_message(&panic)),
        },
        Err(panic) => FailureReason::Panic(panic_message(&panic)),
    };

    observer
        .on_handler_failure(&HandlerFailure {
            seq,
            subscriber: descriptor.subscriber_name,
            target: descriptor.target.clone(),
            mode: descriptor.mode,
            reason,
        })
        .await;
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
