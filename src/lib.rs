//! # crier
//!
//! **crier** is an in-process event bus: a decoupling layer that lets
//! independent components communicate without holding references to each
//! other. Publishers post **typed events** (optionally scoped by a context
//! string) or **string messages** addressed to a named channel; subscribers
//! declare handlers, each carrying a target and a **thread mode** that
//! controls where the handler runs relative to the poster.
//!
//! ## Architecture
//! ```text
//!  Arc<dyn Subscriber> ── subscriptions() ──► [Handler, Handler, ...]
//!                                                   │ register_for_events /
//!                                                   │ register_for_channels
//!                                                   ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ EventBus                                                            │
//! │   Registry    key → descriptors, subscriber → keys (weak-held)      │
//! │   Dispatcher  resolve + route per thread mode, failure isolation    │
//! │   Lanes       main / background single-consumer FIFO workers        │
//! └────┬───────────────────┬──────────────────┬─────────────────┬───────┘
//!      │ Posting           │ Main             │ Async           │ Background
//!      ▼                   ▼                  ▼                 ▼
//!   inline,           main lane           tokio::spawn     background lane
//!   before post       (FIFO worker)       (unordered)      (FIFO worker), or
//!   returns                                                inline off-main
//! ```
//!
//! ## Delivery contract
//! - Posting with zero subscribers is a valid no-op (fire and forget).
//! - Context strings match exactly; `""` is a normal context, not a wildcard.
//! - Lane deliveries preserve enqueue order and never overlap; nothing is
//!   ordered across lanes or across distinct target keys.
//! - Handler failures (errors and panics) are isolated in all four modes:
//!   they reach the [`ErrorObserver`] hook and never abort sibling
//!   deliveries or the poster.
//! - The registry holds subscribers weakly; registration never keeps a
//!   subscriber alive.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use crier::{EventBus, Handler, Subscriber, ThreadMode};
//!
//! struct TemperatureChanged(f32);
//!
//! struct Display {
//!     updates: Arc<AtomicU32>,
//! }
//!
//! impl Subscriber for Display {
//!     fn subscriptions(&self) -> Vec<Handler> {
//!         let updates = Arc::clone(&self.updates);
//!         vec![
//!             Handler::event::<TemperatureChanged, _>(ThreadMode::Main, move |t| {
//!                 updates.fetch_add(1, Ordering::Relaxed);
//!                 println!("now {:.1}°", t.0);
//!                 Ok(())
//!             }),
//!             Handler::channel("status", ThreadMode::Posting, |message| {
//!                 println!("status: {message}");
//!                 Ok(())
//!             }),
//!         ]
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "display"
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), crier::RegisterError> {
//!     let bus = EventBus::new();
//!     let display: Arc<dyn Subscriber> = Arc::new(Display {
//!         updates: Arc::new(AtomicU32::new(0)),
//!     });
//!
//!     bus.register_for_events(Arc::clone(&display))?;
//!     bus.register_for_channels(Arc::clone(&display))?;
//!
//!     bus.post(TemperatureChanged(21.5)).await;
//!     bus.post_to_channel("status", "ready").await;
//!
//!     bus.shutdown().await;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod observers;
mod subscribers;

// ---- Public re-exports ----

pub use core::{global, BusConfig, EventBus, EventBusBuilder, RegistrationKind};
pub use error::{FailureReason, HandlerFailure, HandlerResult, RegisterError};
pub use events::{EventData, Payload, TargetKey};
pub use observers::{ErrorObserver, LogObserver};
pub use subscribers::{Handler, Subscriber, ThreadMode};
