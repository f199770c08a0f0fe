//! Call lifecycle events
//!
//! The call manager publishes [`CallEvent`]s on a broadcast channel. A media
//! recorder subscribes to learn which streams to expect and when a call ends.

pub mod call_events;

pub use call_events::{CallEvent, TerminationReason};
