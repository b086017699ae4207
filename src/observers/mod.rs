//! Failure observation for dispatched handlers.
//!
//! - [`ErrorObserver`] — async hook receiving every
//!   [`HandlerFailure`](crate::HandlerFailure).
//! - [`LogObserver`] — default implementation that logs via `tracing`.

mod log;
mod observer;

pub use log::LogObserver;
pub use observer::ErrorObserver;
