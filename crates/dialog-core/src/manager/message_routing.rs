//! Message routing
//!
//! The receive loop hands every parsed message to [`CallManager::handle_message`]
//! on its own task, so a slow call never holds up the socket.

use std::net::SocketAddr;

use siprec_sip_core::{Message, Method};
use siprec_sip_transport::TransportEvent;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::core::CallManager;
use crate::protocol::{AckHandler, ByeHandler, InviteHandler, OptionsHandler};

impl CallManager {
    /// Consume transport events until the transport closes
    pub async fn run(&self, mut events: mpsc::Receiver<TransportEvent>) {
        info!("Call manager running");

        while let Some(event) = events.recv().await {
            match event {
                TransportEvent::MessageReceived { message, source, .. } => {
                    let manager = self.clone();
                    tokio::spawn(async move {
                        manager.handle_message(message, source).await;
                    });
                }
                TransportEvent::Error { error } => {
                    error!("Transport error: {}", error);
                }
                TransportEvent::Closed => {
                    info!("Transport closed");
                    break;
                }
            }
        }

        info!("Call manager stopped");
    }

    /// Route one message to its method handler.
    ///
    /// Errors are logged here and never propagate: a bad request only fails
    /// itself.
    pub async fn handle_message(&self, message: Message, source: SocketAddr) {
        if message.is_response() {
            debug!("Ignoring response from {}: {}", source, message.start_line);
            return;
        }

        let Some(method) = message.method() else {
            warn!("Dropping datagram without a start-line from {}", source);
            return;
        };
        debug!("{} from {} (Call-ID {:?})", method, source, message.call_id());

        let result = match &method {
            Method::Invite => self.handle_invite_method(message, source).await,
            Method::Ack => self.handle_ack_method(message, source).await,
            Method::Bye => self.handle_bye_method(message, source).await,
            Method::Options => self.handle_options_method(message, source).await,
            other => {
                info!("Ignoring unsupported {} request from {}", other, source);
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!("Failed to handle {} from {}: {}", method, source, e);
        }
    }
}
