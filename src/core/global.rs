//! # Process-wide bus instance.
//!
//! Most applications want exactly one bus. [`global`] returns it, lazily
//! constructing it with default configuration on first access.
//!
//! ## Rules
//! - First access must happen inside a tokio runtime (the bus spawns its
//!   lane workers on construction).
//! - The global bus lives for the process and is never shut down; lane work
//!   still queued at process exit is abandoned. That is the documented
//!   contract, not a bug — components needing drained shutdown should own a
//!   private [`EventBus`](crate::EventBus) and call
//!   [`shutdown`](crate::EventBus::shutdown).
//! - Tests should build private buses via
//!   [`EventBusBuilder`](crate::EventBusBuilder) instead of sharing this one.

use std::sync::OnceLock;

use super::bus::EventBus;

static GLOBAL: OnceLock<EventBus> = OnceLock::new();

/// The process-wide bus, constructed on first access.
///
/// # Panics
/// Panics if the first call happens outside a tokio runtime.
pub fn global() -> &'static EventBus {
    GLOBAL.get_or_init(EventBus::new)
}
