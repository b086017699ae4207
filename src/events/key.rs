//! # Target keys: the resolved address of a delivery.
//!
//! A [`TargetKey`] identifies one bucket of handlers: either a typed event
//! scoped by a context string, or a named channel. Keys compare structurally;
//! an empty context is a distinct, valid key, **not** a wildcard — posting
//! with context `"c1"` never reaches a handler registered for `"c2"` or `""`.
//!
//! Event keys and channel keys live in the same index but can never collide:
//! an event type and a channel that happen to share a name address different
//! buckets.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Lookup key for handler resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetKey {
    /// A typed event, scoped by a context string.
    Event {
        /// Type identity of the event value.
        type_id: TypeId,
        /// Type name, carried for diagnostics only (determined by `type_id`).
        type_name: &'static str,
        /// Context scope. `""` is an ordinary key, not a wildcard.
        context: Arc<str>,
    },
    /// A named channel carrying plain string messages.
    Channel {
        /// Channel name.
        name: Arc<str>,
    },
}

impl TargetKey {
    /// Key for event type `E` in the given context.
    pub fn event<E: Any + Send + Sync>(context: &str) -> Self {
        TargetKey::Event {
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            context: Arc::from(context),
        }
    }

    /// Key for the named channel.
    pub fn channel(name: &str) -> Self {
        TargetKey::Channel {
            name: Arc::from(name),
        }
    }

    /// True for event-typed keys.
    #[inline]
    pub fn is_event(&self) -> bool {
        matches!(self, TargetKey::Event { .. })
    }

    /// True for channel keys.
    #[inline]
    pub fn is_channel(&self) -> bool {
        matches!(self, TargetKey::Channel { .. })
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKey::Event {
                type_name, context, ..
            } => {
                if context.is_empty() {
                    write!(f, "event `{type_name}`")
                } else {
                    write!(f, "event `{type_name}` (context `{context}`)")
                }
            }
            TargetKey::Channel { name } => write!(f, "channel `{name}`"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    struct Pong;

    #[test]
    fn test_same_type_same_context_are_equal() {
        assert_eq!(TargetKey::event::<Ping>("c1"), TargetKey::event::<Ping>("c1"));
    }

    #[test]
    fn test_context_is_not_a_wildcard() {
        assert_ne!(TargetKey::event::<Ping>("c1"), TargetKey::event::<Ping>("c2"));
        assert_ne!(TargetKey::event::<Ping>(""), TargetKey::event::<Ping>("c1"));
    }

    #[test]
    fn test_distinct_types_are_distinct_keys() {
        assert_ne!(TargetKey::event::<Ping>(""), TargetKey::event::<Pong>(""));
    }

    #[test]
    fn test_channel_never_collides_with_event() {
        // An event type and a channel sharing a name address different buckets.
        let ev = TargetKey::event::<Ping>("Ping");
        let ch = TargetKey::channel("Ping");
        assert_ne!(ev, ch);
        assert!(ev.is_event());
        assert!(ch.is_channel());
    }

    #[test]
    fn test_display_is_stable() {
        let ch = TargetKey::channel("log");
        assert_eq!(ch.to_string(), "channel `log`");
    }
}
