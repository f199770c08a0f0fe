//! Call manager
//!
//! [`CallManager`] ties the pieces together: it reads transport events,
//! dispatches each message to its method handler on a task of its own, owns
//! the [`CallTable`] handle and runs the per-call timers.

pub mod call_table;
pub mod core;
pub mod message_routing;
pub mod timers;

pub use call_table::CallTable;
pub use core::CallManager;
