//! # Generic event wrapper with an ownership flag.
//!
//! Some event types prefer to wrap their payload instead of carrying it
//! inline, while recording whether the wrapper owns the payload's lifetime.
//! [`EventData`] models that choice as a tag fixed at construction:
//!
//! - [`EventData::Owned`] — dropping the wrapper releases the payload.
//! - [`EventData::Shared`] — a non-owning view; dropping the wrapper only
//!   drops its handle, the payload lives as long as other holders keep it.
//!
//! The tag cannot change after construction, so a wrapper shared across
//! threads never races on its ownership decision. Release is deterministic:
//! Drop, or an explicit [`EventData::release`].

use std::ops::Deref;
use std::sync::Arc;

/// Event payload holder, owning or viewing its data.
#[derive(Debug, Clone)]
pub enum EventData<T> {
    /// The wrapper owns the payload; dropping it releases the payload.
    Owned(T),
    /// Non-owning view of a payload shared elsewhere.
    Shared(Arc<T>),
}

impl<T> EventData<T> {
    /// Wraps a payload the event owns.
    pub fn owned(data: T) -> Self {
        EventData::Owned(data)
    }

    /// Wraps a shared payload without taking ownership of its lifetime.
    pub fn shared(data: Arc<T>) -> Self {
        EventData::Shared(data)
    }

    /// True if dropping this wrapper releases the payload.
    ///
    /// Fixed at construction.
    #[inline]
    pub fn owns_data(&self) -> bool {
        matches!(self, EventData::Owned(_))
    }

    /// Borrows the payload.
    #[inline]
    pub fn get(&self) -> &T {
        match self {
            EventData::Owned(data) => data,
            EventData::Shared(data) => data,
        }
    }

    /// Explicitly releases the wrapper, returning the payload if owned.
    ///
    /// A `Shared` wrapper returns `None`: the view is dropped but the payload
    /// belongs to its other holders.
    pub fn release(self) -> Option<T> {
        match self {
            EventData::Owned(data) => Some(data),
            EventData::Shared(_) => None,
        }
    }
}

impl<T> Deref for EventData<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> From<T> for EventData<T> {
    fn from(data: T) -> Self {
        EventData::Owned(data)
    }
}

impl<T> From<Arc<T>> for EventData<T> {
    fn from(data: Arc<T>) -> Self {
        EventData::Shared(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_releases_the_payload() {
        let wrapped = EventData::owned(vec![1, 2, 3]);
        assert!(wrapped.owns_data());
        assert_eq!(wrapped.release(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_shared_is_a_view() {
        let shared = Arc::new(String::from("payload"));
        let wrapped = EventData::shared(Arc::clone(&shared));
        assert!(!wrapped.owns_data());
        assert_eq!(&*wrapped, "payload");
        // Releasing the view leaves the payload with its other holders.
        assert_eq!(wrapped.release(), None);
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn test_deref_reads_through() {
        let wrapped = EventData::owned(41_u64);
        assert_eq!(*wrapped + 1, 42);
    }
}
