//! SIPREC recording server
//!
//! Binds the SIP UDP socket, answers recording sessions and logs every call
//! event until interrupted.

mod logging;
mod settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use siprec_dialog_core::prelude::*;
use siprec_sip_transport::{bind_udp, Transport};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::logging::{parse_log_level, setup_logging, LoggingConfig};
use crate::settings::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::new(parse_log_level(&args.log_level)?);
    if args.json_logs {
        logging = logging.with_json();
    }
    setup_logging(logging)?;

    let config = args.server_config()?;
    info!("Starting siprec-server v{}", env!("CARGO_PKG_VERSION"));

    let (transport, transport_events) = bind_udp(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    let transport = Arc::new(transport);

    let manager = CallManager::new(config, transport.clone()).await?;
    info!(
        "Recording server listening on {} (advertising {})",
        transport.local_addr()?,
        manager.identity()
    );

    tokio::spawn(log_call_events(manager.clone()));

    let server = tokio::spawn({
        let manager = manager.clone();
        async move { manager.run(transport_events).await }
    });

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
    info!("Shutting down");
    transport.close().await?;
    server.await.context("Server task failed")?;

    Ok(())
}

async fn log_call_events(manager: CallManager) {
    let mut events = manager.subscribe();
    loop {
        match events.recv().await {
            Ok(CallEvent::CallEstablished { call_id, peer, offer, metadata }) => info!(
                "Recording session {} from {}: {} stream(s), metadata {}",
                call_id,
                peer,
                offer.media.len(),
                if metadata.is_some() { "present" } else { "absent" }
            ),
            Ok(CallEvent::CallConfirmed { call_id }) => info!("Call {} confirmed", call_id),
            Ok(CallEvent::AckTimeout { call_id }) => warn!("No ACK for call {}", call_id),
            Ok(CallEvent::CallTerminated { call_id, reason }) => {
                info!("Call {} terminated ({})", call_id, reason)
            }
            Err(RecvError::Lagged(missed)) => warn!("Event logger missed {} events", missed),
            Err(RecvError::Closed) => break,
        }
    }
}
