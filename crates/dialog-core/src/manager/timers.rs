//! Per-call timers
//!
//! Both timers are independent tasks. Neither holds the call: when they fire
//! they go back to the call table, which decides atomically whether there is
//! still anything to do.

use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use super::core::CallManager;
use crate::builders::bye_request;
use crate::dialog::CallState;
use crate::errors::DialogResult;
use crate::events::{CallEvent, TerminationReason};

impl CallManager {
    /// Watch for the ACK of an answered call.
    ///
    /// If none arrives within the configured timeout an `AckTimeout` event is
    /// published; the call itself is left as it is.
    pub(crate) fn spawn_ack_watchdog(&self, call_id: String, mut state: watch::Receiver<CallState>) {
        let manager = self.clone();
        let limit = self.config().ack_timeout();

        tokio::spawn(async move {
            let settled = timeout(limit, async {
                state.wait_for(CallState::is_settled).await.map(|s| *s)
            })
            .await;

            match settled {
                Ok(Ok(state)) => debug!("Call {} settled as {} before ACK timeout", call_id, state),
                Ok(Err(_)) => debug!("Call {} went away while waiting for ACK", call_id),
                Err(_) => {
                    warn!("No ACK for call {} within {:?}", call_id, limit);
                    manager.emit(CallEvent::AckTimeout { call_id });
                }
            }
        });
    }

    /// Schedule the server-initiated BYE for a confirmed call
    pub(crate) fn spawn_teardown(&self, call_id: String) {
        let manager = self.clone();
        let delay = self.config().teardown_after();

        tokio::spawn(async move {
            sleep(delay).await;
            if let Err(e) = manager.teardown(&call_id).await {
                warn!("Teardown of call {} failed: {}", call_id, e);
            }
        });
    }

    /// Remove a confirmed call and send it a BYE; a no-op if the call is gone
    pub(crate) async fn teardown(&self, call_id: &str) -> DialogResult<()> {
        let Some(session) = self.calls().take_confirmed(call_id).await? else {
            debug!("Call {} already ended, no teardown needed", call_id);
            return Ok(());
        };

        // Removed from the table first, so the BYE goes out at most once
        let bye = bye_request(&session, self.identity())?;
        self.send(bye, session.peer).await?;
        info!("Sent BYE for call {} to {}", call_id, session.peer);

        self.emit(CallEvent::CallTerminated {
            call_id: call_id.to_string(),
            reason: TerminationReason::LocalTeardown,
        });
        Ok(())
    }
}
