//! ACK Request Handler
//!
//! The ACK confirms the call and starts the recording window; the teardown
//! timer runs from here. ACKs are never answered.

use std::net::SocketAddr;

use siprec_sip_core::Message;
use tracing::{info, warn};

use super::call_id_of;
use crate::errors::{DialogError, DialogResult};
use crate::events::CallEvent;
use crate::manager::CallManager;

/// ACK-specific handling operations
pub trait AckHandler {
    fn handle_ack_method(
        &self,
        request: Message,
        source: SocketAddr,
    ) -> impl std::future::Future<Output = DialogResult<()>> + Send;
}

impl AckHandler for CallManager {
    async fn handle_ack_method(&self, request: Message, source: SocketAddr) -> DialogResult<()> {
        let call_id = call_id_of(&request)?;

        match self.calls().receive_ack(call_id).await {
            Ok(()) => {
                info!(
                    "Call {} confirmed, BYE in {:?}",
                    call_id,
                    self.config().teardown_after()
                );
                self.emit(CallEvent::CallConfirmed { call_id: call_id.to_string() });
                self.spawn_teardown(call_id.to_string());
                Ok(())
            }
            Err(DialogError::UnknownDialog { .. }) => {
                warn!("ACK from {} for unknown call {}", source, call_id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
