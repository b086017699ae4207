//! # Handler declarations.
//!
//! A [`Handler`] is one declared subscription: a target key (event type +
//! context, or channel name), a [`ThreadMode`], and the invocation closure.
//! Subscribers return their handler set from
//! [`Subscriber::subscriptions`](crate::Subscriber::subscriptions); the
//! registry indexes the declarations and never inspects the subscriber
//! itself.
//!
//! ## Constructors
//! - [`Handler::event`] / [`Handler::event_in_context`] — typed event
//!   handlers from plain closures.
//! - [`Handler::channel`] — channel handlers from plain closures.
//! - [`Handler::event_async`] / [`Handler::channel_async`] — the same, from
//!   closures returning futures (for handlers that do I/O).

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::error::HandlerResult;
use crate::events::{Payload, TargetKey};

/// Type-erased handler invocation.
pub(crate) type InvokeFn = Arc<dyn Fn(Payload) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Where a handler executes relative to the task that posted.
///
/// | Mode         | Execution context                           | Ordering |
/// |--------------|---------------------------------------------|----------|
/// | `Posting`    | Inline; completes before `post` returns     | synchronous with the poster |
/// | `Main`       | The bus's main lane (single-consumer FIFO)  | enqueue order |
/// | `Async`      | An independent spawned task                 | none |
/// | `Background` | Background lane if posted from the main lane, otherwise inline | enqueue order on the lane |
///
/// `Main` is always deferred through its queue, even when the poster is
/// already running on the main lane — consistent latency beats the
/// occasional inline shortcut, and it keeps nested posts deadlock-free.
///
/// `Background` exists so main-lane handlers can push slow work off the main
/// lane without spawning unbounded tasks: the background lane is a single
/// serialized worker, so a slow handler delays later background work but
/// never reorders or overlaps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadMode {
    /// Run inline on the posting task, before `post` returns.
    Posting,
    /// Enqueue onto the main lane; runs after `post` returns.
    Main,
    /// Spawn an independent task; fully concurrent, no ordering.
    Async,
    /// Off-main serialized lane when posted from the main lane; inline
    /// otherwise.
    Background,
}

/// One declared subscription: target, thread mode, and invocation.
pub struct Handler {
    pub(crate) target: TargetKey,
    pub(crate) mode: ThreadMode,
    pub(crate) invoke: InvokeFn,
}

impl Handler {
    /// Event handler for type `E` with the default (empty) context.
    pub fn event<E, F>(mode: ThreadMode, handler: F) -> Self
    where
        E: Any + Send + Sync,
        F: Fn(&E) -> HandlerResult + Send + Sync + 'static,
    {
        Self::event_in_context(mode, "", handler)
    }

    /// Event handler for type `E`, scoped to `context`.
    ///
    /// The context is matched exactly; a handler registered for `"c1"` is
    /// never invoked for a post with context `"c2"` or `""`.
    pub fn event_in_context<E, F>(mode: ThreadMode, context: &str, handler: F) -> Self
    where
        E: Any + Send + Sync,
        F: Fn(&E) -> HandlerResult + Send + Sync + 'static,
    {
        let invoke: InvokeFn = Arc::new(move |payload: Payload| {
            let out = match payload.event_ref::<E>() {
                Some(event) => handler(event),
                None => Err("payload did not match the declared event type".into()),
            };
            future::ready(out).boxed()
        });
        Self {
            target: TargetKey::event::<E>(context),
            mode,
            invoke,
        }
    }

    /// Async event handler for type `E`, scoped to `context`.
    ///
    /// The handler receives a shared handle to the event so its future can
    /// outlive the dispatch call.
    pub fn event_async<E, F, Fut>(mode: ThreadMode, context: &str, handler: F) -> Self
    where
        E: Any + Send + Sync,
        F: Fn(Arc<E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let invoke: InvokeFn = Arc::new(move |payload: Payload| match payload.into_event::<E>() {
            Some(event) => handler(event).boxed(),
            None => future::ready(Err("payload did not match the declared event type".into()))
                .boxed(),
        });
        Self {
            target: TargetKey::event::<E>(context),
            mode,
            invoke,
        }
    }

    /// Channel handler for the named channel.
    pub fn channel<F>(name: &str, mode: ThreadMode, handler: F) -> Self
    where
        F: Fn(&str) -> HandlerResult + Send + Sync + 'static,
    {
        let invoke: InvokeFn = Arc::new(move |payload: Payload| {
            let out = match payload.message_ref() {
                Some(message) => handler(message),
                None => Err("payload did not carry a channel message".into()),
            };
            future::ready(out).boxed()
        });
        Self {
            target: TargetKey::channel(name),
            mode,
            invoke,
        }
    }

    /// Async channel handler for the named channel.
    pub fn channel_async<F, Fut>(name: &str, mode: ThreadMode, handler: F) -> Self
    where
        F: Fn(Arc<str>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let invoke: InvokeFn = Arc::new(move |payload: Payload| match payload.into_message() {
            Some(message) => handler(message).boxed(),
            None => future::ready(Err("payload did not carry a channel message".into())).boxed(),
        });
        Self {
            target: TargetKey::channel(name),
            mode,
            invoke,
        }
    }

    /// The target key this handler is addressed by.
    #[inline]
    pub fn target(&self) -> &TargetKey {
        &self.target
    }

    /// The thread mode this handler executes in.
    #[inline]
    pub fn mode(&self) -> ThreadMode {
        self.mode
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("target", &self.target)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
