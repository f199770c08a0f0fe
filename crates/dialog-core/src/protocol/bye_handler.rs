//! BYE Request Handler
//!
//! A BYE from the peer ends the call in whatever state it is in. The 200 OK
//! carries the call's own tag. A BYE for a call we do not know still gets a
//! best-effort 200 OK so the peer stops retransmitting.

use std::net::SocketAddr;

use siprec_sip_core::Message;
use tracing::{info, warn};

use super::call_id_of;
use crate::builders::ok_bye;
use crate::errors::DialogResult;
use crate::events::{CallEvent, TerminationReason};
use crate::manager::CallManager;

/// BYE-specific handling operations
pub trait ByeHandler {
    /// Handle BYE requests (dialog-terminating)
    fn handle_bye_method(
        &self,
        request: Message,
        source: SocketAddr,
    ) -> impl std::future::Future<Output = DialogResult<()>> + Send;
}

impl ByeHandler for CallManager {
    async fn handle_bye_method(&self, request: Message, source: SocketAddr) -> DialogResult<()> {
        let call_id = call_id_of(&request)?;

        let response = match self.calls().remove(call_id).await? {
            Some(session) => {
                info!("Call {} ended by BYE from {}", call_id, source);
                self.emit(CallEvent::CallTerminated {
                    call_id: call_id.to_string(),
                    reason: TerminationReason::RemoteBye,
                });
                ok_bye(&request, source, Some(&session.to_tag))?
            }
            None => {
                warn!("BYE from {} for unknown call {}", source, call_id);
                ok_bye(&request, source, None)?
            }
        };

        self.send(response, source).await
    }
}
