//! Error types used by the bus.
//!
//! This module defines two failure surfaces:
//!
//! - [`RegisterError`] — synchronous errors returned to the caller of a
//!   `register_*` operation.
//! - [`HandlerFailure`] — a report describing one failed handler invocation,
//!   delivered through the [`ErrorObserver`](crate::ErrorObserver) hook.
//!
//! Dispatch failures are isolated per handler: one broken subscriber never
//! aborts sibling deliveries for the same post, and a post with zero matching
//! subscribers is a valid no-op, not an error.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics.

use thiserror::Error;

use crate::core::RegistrationKind;
use crate::events::TargetKey;
use crate::subscribers::ThreadMode;

/// Result type produced by a single handler invocation.
///
/// Handlers return `Err` to report a local failure; the bus forwards it to
/// the error observer and keeps delivering to the remaining handlers.
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// # Errors returned by subscriber registration.
///
/// Registration is partition-scoped: a subscriber holds at most one *events*
/// registration and one *channels* registration at a time. Re-registering
/// without an intervening unregister is rejected rather than silently
/// replaced — duplicate registration is a caller bug worth surfacing.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegisterError {
    /// The subscriber already holds a live registration for this partition.
    #[error("subscriber `{subscriber}` is already registered for {kind}")]
    AlreadyRegistered {
        /// Subscriber name (for logs).
        subscriber: &'static str,
        /// The partition the caller tried to register for.
        kind: RegistrationKind,
    },

    /// The subscriber declares no handlers for this partition.
    ///
    /// A misconfigured subscriber fails loudly at registration time instead
    /// of silently receiving nothing.
    #[error("subscriber `{subscriber}` declares no {kind} handlers")]
    NoHandlers {
        /// Subscriber name (for logs).
        subscriber: &'static str,
        /// The partition the caller tried to register for.
        kind: RegistrationKind,
    },
}

impl RegisterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegisterError::AlreadyRegistered { .. } => "already_registered",
            RegisterError::NoHandlers { .. } => "no_handlers",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegisterError::AlreadyRegistered { subscriber, kind } => {
                format!("duplicate {kind} registration for `{subscriber}`")
            }
            RegisterError::NoHandlers { subscriber, kind } => {
                format!("`{subscriber}` has no {kind} handlers")
            }
        }
    }
}

/// Why a handler invocation failed.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum FailureReason {
    /// The handler returned an error.
    #[error("handler returned an error: {0}")]
    Error(String),

    /// The handler panicked; the panic was caught and did not reach the
    /// poster or the lane worker.
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl FailureReason {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FailureReason::Error(_) => "handler_error",
            FailureReason::Panic(_) => "handler_panic",
        }
    }
}

/// Report describing one failed handler invocation.
///
/// Produced for every thread mode, including `Posting`: failures are always
/// observed through the hook, never propagated to the poster and never
/// allowed to abort sibling dispatches of the same post.
#[derive(Debug, Clone)]
pub struct HandlerFailure {
    /// Sequence stamp assigned when the invocation was scheduled.
    pub seq: u64,
    /// Name of the owning subscriber.
    pub subscriber: &'static str,
    /// The target key the handler was registered under.
    pub target: TargetKey,
    /// The thread mode the handler ran in.
    pub mode: ThreadMode,
    /// What went wrong.
    pub reason: FailureReason,
}

impl HandlerFailure {
    /// Returns a human-readable one-line summary.
    pub fn as_message(&self) -> String {
        format!(
            "subscriber `{}` failed on {} ({:?}): {}",
            self.subscriber, self.target, self.mode, self.reason
        )
    }
}
