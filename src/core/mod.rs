//! Bus core: registry, dispatch, and delivery lanes.
//!
//! This module contains the engine behind the [`EventBus`] facade.
//!
//! Internal modules:
//! - [`registry`]: the two indices (key → descriptors, subscriber → keys)
//!   with their concurrency discipline;
//! - [`dispatcher`]: resolves posts and routes each handler to its thread
//!   mode;
//! - [`lanes`]: the main and background single-consumer FIFO workers;
//! - [`bus`]: the public facade and its builder;
//! - [`config`]: per-bus tunables;
//! - [`global`]: the lazily-built process-wide instance.

mod bus;
mod config;
mod dispatcher;
mod global;
mod lanes;
mod registry;

pub use bus::{EventBus, EventBusBuilder};
pub use config::BusConfig;
pub use global::global;
pub use registry::RegistrationKind;
