//! # The bus facade.
//!
//! [`EventBus`] is the object applications hold: registration, membership
//! checks, and the three post operations. It is a thin pass-through wiring
//! the registry to the dispatch engine.
//!
//! ```text
//! register_for_events ──► Registry (indexes the declared handlers)
//! post(event)         ──► Registry.resolve ──► Dispatcher ──► lanes/spawn/inline
//! unregister_*        ──► Registry (stops future resolutions)
//! ```
//!
//! Buses are built with [`EventBusBuilder`] (or [`EventBus::new`] for the
//! defaults) and must be constructed inside a tokio runtime, which hosts the
//! two lane workers. Dropping the bus closes the lanes; [`EventBus::shutdown`]
//! additionally waits for queued deliveries to drain.

use std::any::Any;
use std::sync::Arc;

use crate::core::config::BusConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::registry::{Registry, RegistrationKind};
use crate::error::RegisterError;
use crate::events::{Payload, TargetKey};
use crate::observers::{ErrorObserver, LogObserver};
use crate::subscribers::Subscriber;

/// In-process event bus with typed events, named channels, and per-handler
/// thread modes.
///
/// ## Example
/// ```no_run
/// use std::sync::Arc;
/// use crier::{EventBus, Handler, Subscriber, ThreadMode};
///
/// struct Ping(u32);
///
/// struct Counter;
///
/// impl Subscriber for Counter {
///     fn subscriptions(&self) -> Vec<Handler> {
///         vec![Handler::event::<Ping, _>(ThreadMode::Posting, |ping: &Ping| {
///             println!("ping {}", ping.0);
///             Ok(())
///         })]
///     }
/// }
///
/// # async fn demo() -> Result<(), crier::RegisterError> {
/// let bus = EventBus::new();
/// let counter: Arc<dyn Subscriber> = Arc::new(Counter);
/// bus.register_for_events(Arc::clone(&counter))?;
/// bus.post(Ping(1)).await;
/// bus.unregister_for_events(&counter);
/// # Ok(())
/// # }
/// ```
pub struct EventBus {
    registry: Arc<Registry>,
    dispatcher: Dispatcher,
}

impl EventBus {
    /// Builds a bus with default configuration and the logging observer.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime (the lanes are spawned here).
    pub fn new() -> Self {
        EventBusBuilder::new().build()
    }

    /// Starts building a bus with explicit configuration.
    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::new()
    }

    // ---- Posting ----

    /// Posts a typed event with the default (empty) context.
    ///
    /// Zero matching subscribers is a valid no-op. Returns once every
    /// `Posting`-mode handler has completed and every other matched handler
    /// is enqueued or spawned.
    pub async fn post<E: Any + Send + Sync>(&self, event: E) {
        self.post_with_context(event, "").await;
    }

    /// Posts a typed event scoped to `context`.
    ///
    /// The context is matched exactly against each handler's declared
    /// context; `""` is an ordinary context, not a wildcard.
    pub async fn post_with_context<E: Any + Send + Sync>(&self, event: E, context: &str) {
        self.dispatcher
            .post(TargetKey::event::<E>(context), Payload::event(event))
            .await;
    }

    /// Posts a string message to the named channel.
    pub async fn post_to_channel(&self, channel: &str, message: &str) {
        self.dispatcher
            .post(TargetKey::channel(channel), Payload::message(message))
            .await;
    }

    // ---- Registration ----

    /// Registers the subscriber's event-keyed handlers.
    ///
    /// # Errors
    /// - [`RegisterError::NoHandlers`] if it declares no event handlers.
    /// - [`RegisterError::AlreadyRegistered`] if it already holds an events
    ///   registration (unregister first; registrations are never replaced).
    pub fn register_for_events(&self, subscriber: Arc<dyn Subscriber>) -> Result<(), RegisterError> {
        self.registry.register(&subscriber, RegistrationKind::Events)
    }

    /// Registers the subscriber's channel-keyed handlers.
    ///
    /// # Errors
    /// Same contract as [`EventBus::register_for_events`], for the channel
    /// partition.
    pub fn register_for_channels(
        &self,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<(), RegisterError> {
        self.registry
            .register(&subscriber, RegistrationKind::Channels)
    }

    /// Removes every event-keyed handler the subscriber owns.
    ///
    /// No-op if it was never registered for events. Invocations already
    /// resolved and enqueued may still deliver; unregistration only stops
    /// future resolutions.
    pub fn unregister_for_events(&self, subscriber: &Arc<dyn Subscriber>) {
        self.registry.unregister(subscriber, RegistrationKind::Events);
    }

    /// Removes every channel-keyed handler the subscriber owns.
    ///
    /// Same contract as [`EventBus::unregister_for_events`].
    pub fn unregister_for_channels(&self, subscriber: &Arc<dyn Subscriber>) {
        self.registry
            .unregister(subscriber, RegistrationKind::Channels);
    }

    /// True if the subscriber holds a live events registration. O(1).
    pub fn is_registered_for_events(&self, subscriber: &Arc<dyn Subscriber>) -> bool {
        self.registry
            .is_registered(subscriber, RegistrationKind::Events)
    }

    /// True if the subscriber holds a live channels registration. O(1).
    pub fn is_registered_for_channels(&self, subscriber: &Arc<dyn Subscriber>) -> bool {
        self.registry
            .is_registered(subscriber, RegistrationKind::Channels)
    }

    // ---- Lifecycle ----

    /// Graceful shutdown: closes both lanes and waits for queued deliveries
    /// to drain.
    ///
    /// Dropping the bus without calling this also stops the workers, but
    /// abandons whatever was still queued.
    pub async fn shutdown(self) {
        self.dispatcher.shutdown().await;
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`EventBus`].
///
/// Exists so tests and embedders get private bus instances instead of being
/// forced through the process-wide one.
pub struct EventBusBuilder {
    config: BusConfig,
    observer: Arc<dyn ErrorObserver>,
}

impl EventBusBuilder {
    /// Starts from the default configuration and the logging observer.
    pub fn new() -> Self {
        Self {
            config: BusConfig::default(),
            observer: Arc::new(LogObserver),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: BusConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the error observer.
    pub fn with_observer(mut self, observer: Arc<dyn ErrorObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Builds the bus, spawning its lane workers.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn build(self) -> EventBus {
        let registry = Arc::new(Registry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry), &self.config, self.observer);
        EventBus {
            registry,
            dispatcher,
        }
    }
}

impl Default for EventBusBuilder {
    fn default() -> Self {
        Self::new()
    }
}
