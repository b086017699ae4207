//! # Delivery lanes: single-consumer FIFO execution contexts.
//!
//! A [`Lane`] is one queue plus one dedicated worker task. The bus owns two:
//! the **main** lane (the designated main/UI context) and the **background**
//! lane (serialized off-main work). Producers enqueue concurrently and never
//! block; only the worker dequeues, so lane deliveries execute strictly in
//! arrival order and never overlap.
//!
//! ```text
//!   post (task A) ──┐
//!   post (task B) ──┼──► [queue] ──► worker ──► handler, handler, ...
//!   post (task C) ──┘                 (one at a time, FIFO)
//! ```
//!
//! The worker runs each job inside a task-local scope naming its lane, so a
//! nested post from inside a lane handler can tell where it is running —
//! that is how `Background` posted from the main lane is detected.
//!
//! A hung handler stalls its own lane and nothing else (documented
//! limitation: there is no per-handler cancellation).

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::dispatcher::{invoke_isolated, Job};
use crate::observers::ErrorObserver;

tokio::task_local! {
    static CURRENT_LANE: LaneKind;
}

/// Which lane a worker (or nested poster) is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LaneKind {
    Main,
    Background,
}

impl LaneKind {
    fn label(self) -> &'static str {
        match self {
            LaneKind::Main => "main",
            LaneKind::Background => "background",
        }
    }
}

/// The lane the current task is executing on, if any.
pub(crate) fn current_lane() -> Option<LaneKind> {
    CURRENT_LANE.try_with(|kind| *kind).ok()
}

enum JobSender {
    Bounded(mpsc::Sender<Job>),
    Unbounded(mpsc::UnboundedSender<Job>),
}

enum JobReceiver {
    Bounded(mpsc::Receiver<Job>),
    Unbounded(mpsc::UnboundedReceiver<Job>),
}

impl JobReceiver {
    async fn recv(&mut self) -> Option<Job> {
        match self {
            JobReceiver::Bounded(rx) => rx.recv().await,
            JobReceiver::Unbounded(rx) => rx.recv().await,
        }
    }
}

/// One single-consumer FIFO queue with its worker task.
pub(crate) struct Lane {
    kind: LaneKind,
    bus: &'static str,
    tx: JobSender,
    worker: JoinHandle<()>,
}

impl Lane {
    /// Spawns the lane worker.
    ///
    /// `capacity == None` means unbounded (nothing is ever dropped); a
    /// bounded lane drops the job for a handler when full, with a warning.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn(
        kind: LaneKind,
        bus: &'static str,
        capacity: Option<usize>,
        observer: Arc<dyn ErrorObserver>,
    ) -> Self {
        let (tx, rx) = match capacity {
            None => {
                let (tx, rx) = mpsc::unbounded_channel();
                (JobSender::Unbounded(tx), JobReceiver::Unbounded(rx))
            }
            Some(n) => {
                let (tx, rx) = mpsc::channel(n);
                (JobSender::Bounded(tx), JobReceiver::Bounded(rx))
            }
        };

        let worker = tokio::spawn(run_worker(kind, rx, observer));
        Self {
            kind,
            bus,
            tx,
            worker,
        }
    }

    /// Enqueues one job; never blocks the caller.
    ///
    /// On a full or closed queue the job is dropped for that handler and a
    /// warning names the subscriber.
    pub(crate) fn enqueue(&self, job: Job) {
        let dropped = match &self.tx {
            JobSender::Unbounded(tx) => tx.send(job).err().map(|e| e.0),
            JobSender::Bounded(tx) => match tx.try_send(job) {
                Ok(()) => None,
                Err(mpsc::error::TrySendError::Full(job))
                | Err(mpsc::error::TrySendError::Closed(job)) => Some(job),
            },
        };
        if let Some(job) = dropped {
            tracing::warn!(
                bus = self.bus,
                lane = self.kind.label(),
                subscriber = job.descriptor.subscriber_name,
                seq = job.seq,
                "lane dropped a delivery: queue full or closed",
            );
        }
    }

    /// Closes the queue and waits for the worker to drain and exit.
    pub(crate) async fn shutdown(self) {
        drop(self.tx);
        let _ = self.worker.await;
    }
}

async fn run_worker(kind: LaneKind, mut rx: JobReceiver, observer: Arc<dyn ErrorObserver>) {
    while let Some(job) = rx.recv().await {
        CURRENT_LANE
            .scope(kind, invoke_isolated(job, observer.as_ref()))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;
    use crate::core::registry::{HandlerDescriptor, SubscriberId};
    use crate::events::Payload;
    use crate::observers::LogObserver;
    use crate::subscribers::{Handler, Subscriber, ThreadMode};

    struct Probe;

    impl Subscriber for Probe {
        fn subscriptions(&self) -> Vec<Handler> {
            Vec::new()
        }
    }

    /// Builds a lane job around an arbitrary channel-handler closure.
    fn job(seq: u64, handler: Handler) -> Job {
        let owner: Arc<dyn Subscriber> = Arc::new(Probe);
        let descriptor = Arc::new(HandlerDescriptor {
            owner: Arc::downgrade(&owner),
            owner_id: SubscriberId::of(&owner),
            subscriber_name: "probe",
            target: handler.target().clone(),
            mode: handler.mode(),
            invoke: handler.invoke.clone(),
        });
        Job {
            seq,
            descriptor,
            owner,
            payload: Payload::message("x"),
        }
    }

    async fn wait_until(probe: impl Fn() -> bool) {
        timeout(Duration::from_secs(5), async {
            while !probe() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn test_lane_delivers_in_enqueue_order() {
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let lane = Lane::spawn(LaneKind::Main, "test", None, Arc::new(LogObserver));

        for seq in 0..16_u64 {
            let order = Arc::clone(&order);
            lane.enqueue(job(
                seq,
                Handler::channel("t", ThreadMode::Main, move |_| {
                    order.lock().push(seq);
                    Ok(())
                }),
            ));
        }

        lane.shutdown().await;
        assert_eq!(*order.lock(), (0..16).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_lane_jobs_never_overlap() {
        let active = Arc::new(AtomicBool::new(false));
        let overlapped = Arc::new(AtomicBool::new(false));
        let done = Arc::new(AtomicUsize::new(0));
        let lane = Lane::spawn(LaneKind::Background, "test", None, Arc::new(LogObserver));

        for seq in 0..4_u64 {
            let active = Arc::clone(&active);
            let overlapped = Arc::clone(&overlapped);
            let done = Arc::clone(&done);
            lane.enqueue(job(
                seq,
                Handler::channel_async("t", ThreadMode::Background, move |_| {
                    let active = Arc::clone(&active);
                    let overlapped = Arc::clone(&overlapped);
                    let done = Arc::clone(&done);
                    async move {
                        if active.swap(true, Ordering::SeqCst) {
                            overlapped.store(true, Ordering::SeqCst);
                        }
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        active.store(false, Ordering::SeqCst);
                        done.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }
                }),
            ));
        }

        let done_probe = Arc::clone(&done);
        wait_until(move || done_probe.load(Ordering::SeqCst) == 4).await;
        assert!(!overlapped.load(Ordering::SeqCst));
        lane.shutdown().await;
    }

    #[tokio::test]
    async fn test_worker_scopes_its_lane_kind() {
        let seen = Arc::new(parking_lot::Mutex::new(None));
        let lane = Lane::spawn(LaneKind::Background, "test", None, Arc::new(LogObserver));

        let seen_in = Arc::clone(&seen);
        lane.enqueue(job(
            0,
            Handler::channel("t", ThreadMode::Background, move |_| {
                *seen_in.lock() = Some(current_lane());
                Ok(())
            }),
        ));

        lane.shutdown().await;
        assert_eq!(*seen.lock(), Some(Some(LaneKind::Background)));
        // Outside any worker there is no lane.
        assert_eq!(current_lane(), None);
    }

    #[tokio::test]
    async fn test_bounded_lane_drops_on_overflow() {
        let delivered = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(tokio::sync::Notify::new());
        let lane = Lane::spawn(LaneKind::Main, "test", Some(1), Arc::new(LogObserver));

        // First job parks the worker so later enqueues hit the bounded queue.
        let gate_in = Arc::clone(&gate);
        lane.enqueue(job(
            0,
            Handler::channel_async("t", ThreadMode::Main, move |_| {
                let gate = Arc::clone(&gate_in);
                async move {
                    gate.notified().await;
                    Ok(())
                }
            }),
        ));
        // Give the worker a beat to pick the first job up.
        tokio::time::sleep(Duration::from_millis(20)).await;

        for seq in 1..8_u64 {
            let delivered = Arc::clone(&delivered);
            lane.enqueue(job(
                seq,
                Handler::channel("t", ThreadMode::Main, move |_| {
                    delivered.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            ));
        }

        gate.notify_one();
        lane.shutdown().await;
        // Exactly one of the counted jobs fit the capacity-1 queue.
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
    }
}
