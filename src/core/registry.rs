//! # Subscriber registry.
//!
//! The registry is pure data with concurrency control, no execution logic.
//! It keeps two indices per bus:
//!
//! - target key → ordered descriptors (insertion order preserved for
//!   delivery iteration — best effort, not a contract);
//! - subscriber identity → the keys it owns, partitioned into event keys and
//!   channel keys, so membership checks are O(1) and unregistration is O(k)
//!   in the subscriber's key count.
//!
//! ## Rules
//! - Registration is partition-scoped and rejected on duplicates
//!   (`AlreadyRegistered`) — replace-on-duplicate hides caller bugs.
//! - Unregistering a subscriber that was never registered is a no-op;
//!   callers unregister defensively on teardown.
//! - `resolve` returns a snapshot taken under the read lock: a concurrent
//!   register/unregister never tears an in-progress iteration. Invocations
//!   already resolved may still deliver to a subscriber being unregistered;
//!   unregistration only stops future resolutions.
//! - Descriptors hold the subscriber weakly: the registry is never the
//!   reason a subscriber stays alive. Descriptors orphaned by a dropped
//!   subscriber are pruned lazily, when `resolve` next encounters them.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::error::RegisterError;
use crate::events::TargetKey;
use crate::subscribers::{InvokeFn, Subscriber, ThreadMode};

/// Identity of a registered subscriber: its `Arc` allocation address.
///
/// Stable across clones of the same `Arc`, distinct across allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SubscriberId(usize);

impl SubscriberId {
    pub(crate) fn of(subscriber: &Arc<dyn Subscriber>) -> Self {
        SubscriberId(Arc::as_ptr(subscriber) as *const () as usize)
    }
}

/// Which handler partition a registration covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationKind {
    /// Event-keyed handlers (typed event + context).
    Events,
    /// Channel-keyed handlers (named string channels).
    Channels,
}

impl RegistrationKind {
    /// True if `target` belongs to this partition.
    pub(crate) fn covers(self, target: &TargetKey) -> bool {
        match self {
            RegistrationKind::Events => target.is_event(),
            RegistrationKind::Channels => target.is_channel(),
        }
    }
}

impl fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationKind::Events => f.write_str("events"),
            RegistrationKind::Channels => f.write_str("channels"),
        }
    }
}

/// Registry record for one declared handler.
///
/// Immutable once stored; removed only by unregistration.
pub(crate) struct HandlerDescriptor {
    /// Weak back-reference; upgraded at dispatch, skipped if dead.
    pub(crate) owner: Weak<dyn Subscriber>,
    pub(crate) owner_id: SubscriberId,
    pub(crate) subscriber_name: &'static str,
    pub(crate) target: TargetKey,
    pub(crate) mode: ThreadMode,
    pub(crate) invoke: InvokeFn,
}

/// Keys owned by one subscriber, split by partition.
#[derive(Default)]
struct OwnedKeys {
    events: HashSet<TargetKey>,
    channels: HashSet<TargetKey>,
}

impl OwnedKeys {
    fn partition(&self, kind: RegistrationKind) -> &HashSet<TargetKey> {
        match kind {
            RegistrationKind::Events => &self.events,
            RegistrationKind::Channels => &self.channels,
        }
    }

    fn partition_mut(&mut self, kind: RegistrationKind) -> &mut HashSet<TargetKey> {
        match kind {
            RegistrationKind::Events => &mut self.events,
            RegistrationKind::Channels => &mut self.channels,
        }
    }

    fn is_empty(&self) -> bool {
        self.events.is_empty() && self.channels.is_empty()
    }
}

struct Inner {
    buckets: HashMap<TargetKey, Vec<Arc<HandlerDescriptor>>>,
    subscribers: HashMap<SubscriberId, OwnedKeys>,
}

/// Live mapping from target keys to subscriber descriptors.
pub(crate) struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                buckets: HashMap::new(),
                subscribers: HashMap::new(),
            }),
        }
    }

    /// Registers `subscriber`'s handlers for one partition.
    ///
    /// Reads the subscriber's declaration once, filters it to the requested
    /// partition, and indexes the result. Fails with `NoHandlers` if the
    /// filtered set is empty and `AlreadyRegistered` if the subscriber
    /// already holds a live registration for this partition.
    pub(crate) fn register(
        &self,
        subscriber: &Arc<dyn Subscriber>,
        kind: RegistrationKind,
    ) -> Result<(), RegisterError> {
        let name = subscriber.name();
        let handlers: Vec<_> = subscriber
            .subscriptions()
            .into_iter()
            .filter(|h| kind.covers(h.target()))
            .collect();
        if handlers.is_empty() {
            return Err(RegisterError::NoHandlers {
                subscriber: name,
                kind,
            });
        }

        let id = SubscriberId::of(subscriber);
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        if inner
            .subscribers
            .get(&id)
            .is_some_and(|owned| !owned.partition(kind).is_empty())
        {
            return Err(RegisterError::AlreadyRegistered {
                subscriber: name,
                kind,
            });
        }

        let owned = inner.subscribers.entry(id).or_default();
        for handler in handlers {
            let target = handler.target().clone();
            let descriptor = Arc::new(HandlerDescriptor {
                owner: Arc::downgrade(subscriber),
                owner_id: id,
                subscriber_name: name,
                target: target.clone(),
                mode: handler.mode(),
                invoke: handler.invoke.clone(),
            });
            inner.buckets.entry(target.clone()).or_default().push(descriptor);
            owned.partition_mut(kind).insert(target);
        }
        Ok(())
    }

    /// Removes every descriptor `subscriber` owns in one partition.
    ///
    /// No-op if the subscriber holds no registration for that partition.
    pub(crate) fn unregister(&self, subscriber: &Arc<dyn Subscriber>, kind: RegistrationKind) {
        let id = SubscriberId::of(subscriber);
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let Some(owned) = inner.subscribers.get_mut(&id) else {
            return;
        };
        let keys = std::mem::take(owned.partition_mut(kind));
        if owned.is_empty() {
            inner.subscribers.remove(&id);
        }

        for key in keys {
            if let Some(bucket) = inner.buckets.get_mut(&key) {
                bucket.retain(|d| d.owner_id != id);
                if bucket.is_empty() {
                    inner.buckets.remove(&key);
                }
            }
        }
    }

    /// O(1) membership check for one partition.
    pub(crate) fn is_registered(
        &self,
        subscriber: &Arc<dyn Subscriber>,
        kind: RegistrationKind,
    ) -> bool {
        let id = SubscriberId::of(subscriber);
        self.inner
            .read()
            .subscribers
            .get(&id)
            .is_some_and(|owned| !owned.partition(kind).is_empty())
    }

    /// Snapshot of the live descriptors addressed by `key`, in insertion
    /// order.
    ///
    /// The returned vector is detached from the indices: concurrent
    /// registration changes are invisible to the caller's iteration.
    ///
    /// Descriptors whose subscriber was dropped without unregistering are
    /// pruned here, lazily per key, so a bucket never accumulates dead
    /// entries across posts.
    pub(crate) fn resolve(&self, key: &TargetKey) -> Vec<Arc<HandlerDescriptor>> {
        let snapshot: Vec<Arc<HandlerDescriptor>> = self
            .inner
            .read()
            .buckets
            .get(key)
            .cloned()
            .unwrap_or_default();
        if snapshot.iter().all(|d| d.owner.strong_count() > 0) {
            return snapshot;
        }

        self.prune_dead(key);
        snapshot
            .into_iter()
            .filter(|d| d.owner.strong_count() > 0)
            .collect()
    }

    /// Drops `key`'s dead-weak descriptors from both indices.
    fn prune_dead(&self, key: &TargetKey) {
        let kind = if key.is_event() {
            RegistrationKind::Events
        } else {
            RegistrationKind::Channels
        };
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let Some(bucket) = inner.buckets.get_mut(key) else {
            return;
        };
        let mut dead = Vec::new();
        bucket.retain(|d| {
            let alive = d.owner.strong_count() > 0;
            if !alive {
                dead.push(d.owner_id);
            }
            alive
        });
        if bucket.is_empty() {
            inner.buckets.remove(key);
        }

        for id in dead {
            if let Some(owned) = inner.subscribers.get_mut(&id) {
                owned.partition_mut(kind).remove(key);
                if owned.is_empty() {
                    inner.subscribers.remove(&id);
                }
            }
        }
    }
}
