//! Event data model: target keys, dispatch payloads, and the generic
//! ownership-tagged event wrapper.
//!
//! ## Contents
//! - [`TargetKey`] — the resolved address of a delivery (event-type+context
//!   or channel name).
//! - [`Payload`] — the cheap-clone value handed to every matched handler.
//! - [`EventData`] — owning/viewing wrapper for event types that carry their
//!   payload indirectly.

mod data;
mod key;
mod payload;

pub use data::EventData;
pub use key::TargetKey;
pub use payload::Payload;
