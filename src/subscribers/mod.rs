//! # Subscribers: declarations consumed by the registry.
//!
//! A subscriber implements [`Subscriber`] and declares its handlers as
//! [`Handler`] values, each addressing a target key with a [`ThreadMode`].
//!
//! ```text
//! Registration flow:
//!   Arc<dyn Subscriber> ── subscriptions() ──► [Handler, Handler, ...]
//!                                                   │
//!                                       Registry indexes by target key
//! ```
//!
//! Handlers are plain closures (or closures returning futures); there is no
//! attribute scanning or runtime reflection anywhere in the bus.

mod handler;
mod subscriber;

pub use handler::{Handler, ThreadMode};
pub use subscriber::Subscriber;

pub(crate) use handler::InvokeFn;
