//! # siprec-dialog-core
//!
//! Call handling for a SIPREC recording server (RFC 7866 Session Recording
//! Server role).
//!
//! A Session Recording Client (typically an SBC) sends an INVITE whose
//! multipart body carries an SDP offer with one labelled stream per
//! participant, plus XML recording metadata. This crate answers it, tracks
//! the call through its ACK and ends it with a BYE after a configured
//! recording window.
//!
//! ## Layout
//!
//! - [`builders`]: synthesis of every response and request the server sends
//! - [`dialog`]: the per-call state machine
//! - [`manager`]: the [`CallManager`], its call table actor and timers
//! - [`protocol`]: one handler per SIP method
//! - [`events`]: lifecycle events for media sinks
//! - [`config`]: [`ServerConfig`]
//!
//! ## Running a server
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use siprec_dialog_core::prelude::*;
//! use siprec_sip_transport::bind_udp;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::default();
//! let (transport, events) = bind_udp(config.bind_addr).await?;
//! let manager = CallManager::new(config, Arc::new(transport)).await?;
//!
//! let mut calls = manager.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(event) = calls.recv().await {
//!         println!("{:?}", event);
//!     }
//! });
//!
//! manager.run(events).await;
//! # Ok(())
//! # }
//! ```

pub mod builders;
pub mod config;
pub mod dialog;
pub mod errors;
pub mod events;
pub mod manager;
pub mod protocol;

pub use config::ServerConfig;
pub use dialog::{CallSession, CallState};
pub use errors::{DialogError, DialogResult};
pub use events::{CallEvent, TerminationReason};
pub use manager::{CallManager, CallTable};

/// Commonly used items
pub mod prelude {
    pub use crate::builders::ServerIdentity;
    pub use crate::config::ServerConfig;
    pub use crate::dialog::{CallSession, CallState};
    pub use crate::errors::{DialogError, DialogResult};
    pub use crate::events::{CallEvent, TerminationReason};
    pub use crate::manager::{CallManager, CallTable};
}
