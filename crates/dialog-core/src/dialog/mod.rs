//! Call sessions
//!
//! A recording call is a dialog keyed by Call-ID alone. Its lifecycle:
//!
//! ```text
//! INVITE ──► Early ──200 OK sent──► AwaitingAck ──ACK──► Confirmed
//!              │                         │                   │
//!              └─────────── BYE sent or received ────────────┴──► Terminated
//! ```
//!
//! `Terminated` is absorbing. A missing ACK is reported but does not end the
//! call.

pub mod dialog_state;
pub mod session;

pub use dialog_state::CallState;
pub use session::{generate_tag, CallSession};
