//! # Dispatch payloads.
//!
//! A [`Payload`] is the value handed to every handler matched by one post.
//! It is cheap to clone: the event value (or message string) is allocated
//! once and shared across all matched handlers as an `Arc`, the same way
//! the fan-out path shares one event per post.

use std::any::Any;
use std::sync::Arc;

/// The value carried by one dispatch.
#[derive(Clone)]
pub enum Payload {
    /// A typed event value, shared across all handlers matched by the post.
    Event(Arc<dyn Any + Send + Sync>),
    /// A plain string message addressed to a channel.
    Message(Arc<str>),
}

impl Payload {
    /// Wraps an event value for dispatch.
    pub fn event<E: Any + Send + Sync>(event: E) -> Self {
        Payload::Event(Arc::new(event))
    }

    /// Wraps a channel message for dispatch.
    pub fn message(message: &str) -> Self {
        Payload::Message(Arc::from(message))
    }

    /// Borrows the event value as `E`, if this payload carries one.
    pub fn event_ref<E: Any + Send + Sync>(&self) -> Option<&E> {
        match self {
            Payload::Event(any) => any.downcast_ref::<E>(),
            Payload::Message(_) => None,
        }
    }

    /// Consumes the payload into a shared handle to the event value.
    ///
    /// Used by async handlers, which need an owned handle to move into
    /// their future.
    pub fn into_event<E: Any + Send + Sync>(self) -> Option<Arc<E>> {
        match self {
            Payload::Event(any) => any.downcast::<E>().ok(),
            Payload::Message(_) => None,
        }
    }

    /// Borrows the channel message, if this payload carries one.
    pub fn message_ref(&self) -> Option<&str> {
        match self {
            Payload::Event(_) => None,
            Payload::Message(msg) => Some(msg),
        }
    }

    /// Consumes the payload into a shared handle to the channel message.
    pub fn into_message(self) -> Option<Arc<str>> {
        match self {
            Payload::Event(_) => None,
            Payload::Message(msg) => Some(msg),
        }
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Event(_) => f.write_str("Payload::Event(..)"),
            Payload::Message(msg) => write!(f, "Payload::Message({msg:?})"),
        }
    }
}
