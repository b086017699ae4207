//! # Core subscriber trait
//!
//! `Subscriber` is the capability interface a type implements to receive
//! deliveries. Instead of scanning objects for tagged methods at runtime, a
//! subscriber *declares* its handler set; the registry consumes that
//! declaration and never inspects the object itself.
//!
//! ## Contract
//! - `subscriptions()` must be stable: repeated calls on the same instance
//!   declare the same targets. It is read once per registration.
//! - Handler closures must be `'static`; subscribers typically give them
//!   shared handles (`Arc`) to whatever state they mutate.
//! - The registry holds the subscriber weakly. Registration alone never
//!   keeps a subscriber alive; drop it (or unregister) and delivery stops.
//!
//! ## Example (skeleton)
//! ```rust
//! use crier::{Handler, Subscriber, ThreadMode};
//!
//! struct Audit;
//!
//! impl Subscriber for Audit {
//!     fn subscriptions(&self) -> Vec<Handler> {
//!         vec![Handler::channel("audit", ThreadMode::Background, |message| {
//!             // write audit record...
//!             let _ = message;
//!             Ok(())
//!         })]
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "audit"
//!     }
//! }
//! ```

use super::Handler;

/// Capability interface for bus subscribers.
///
/// Registered as `Arc<dyn Subscriber>`; the `Arc` allocation is the
/// subscriber's identity for `is_registered_*` and unregistration.
pub trait Subscriber: Send + Sync + 'static {
    /// Declares this subscriber's handler set.
    ///
    /// Called once when the subscriber registers (per partition). An empty
    /// declaration for the requested partition fails registration with
    /// [`RegisterError::NoHandlers`](crate::RegisterError::NoHandlers).
    fn subscriptions(&self) -> Vec<Handler>;

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
