//! INVITE Request Handler
//!
//! A recording session starts with an INVITE whose body is a
//! `multipart/mixed` envelope holding the SDP offer and the recording
//! metadata. Processing steps:
//!
//! 1. Register the call under its Call-ID; a Call-ID already in the table is
//!    a duplicate and is ignored
//! 2. Send 100 Trying
//! 3. Extract the offer, build the SDP answer and send 200 OK
//! 4. Mark the call answered and start the ACK watchdog
//!
//! If anything fails between registration and the 200 OK the call is removed
//! again, so a half-built call never lingers in the table.

use std::net::SocketAddr;

use siprec_sip_core::{extract_parts, parse_sdp, BodyKind, Error as SipError, Message, SessionDescription};
use tracing::{debug, info, warn};

use super::call_id_of;
use crate::builders::{build_sdp_answer, ok_invite, trying};
use crate::dialog::CallSession;
use crate::errors::{DialogError, DialogResult};
use crate::events::CallEvent;
use crate::manager::CallManager;

/// INVITE-specific handling operations
pub trait InviteHandler {
    /// Handle an INVITE (dialog-creating)
    fn handle_invite_method(
        &self,
        request: Message,
        source: SocketAddr,
    ) -> impl std::future::Future<Output = DialogResult<()>> + Send;
}

impl InviteHandler for CallManager {
    async fn handle_invite_method(&self, request: Message, source: SocketAddr) -> DialogResult<()> {
        let call_id = call_id_of(&request)?.to_string();
        info!("INVITE for call {} from {}", call_id, source);

        let session = CallSession::new(call_id.clone(), source, request.clone());
        let to_tag = session.to_tag.clone();
        let state = match self.calls().insert(session).await {
            Ok(state) => state,
            Err(DialogError::DialogExists { .. }) => {
                warn!("Ignoring duplicate INVITE for call {}", call_id);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        match self.answer_invite(&request, source, &call_id, &to_tag).await {
            Ok(()) => {
                self.spawn_ack_watchdog(call_id, state);
                Ok(())
            }
            Err(e) => {
                warn!("Aborting setup of call {}: {}", call_id, e);
                self.calls().remove(&call_id).await?;
                Err(e)
            }
        }
    }
}

impl CallManager {
    async fn answer_invite(
        &self,
        request: &Message,
        source: SocketAddr,
        call_id: &str,
        to_tag: &str,
    ) -> DialogResult<()> {
        self.send(trying(request, source)?, source).await?;
        debug!("Sent 100 Trying for call {}", call_id);

        let (offer, metadata) = extract_offer(request)?;
        let answer = build_sdp_answer(&offer, self.identity().ip, &self.config().media_ports)?;
        let ok = ok_invite(
            request,
            source,
            to_tag,
            self.identity(),
            self.config().session_expires,
            &answer,
        )?;
        self.send(ok, source).await?;

        let state = self
            .calls()
            .mark_answered(call_id, offer.clone(), metadata.clone())
            .await?;
        info!(
            "Answered call {} with {} streams, labels {:?}, state {}",
            call_id,
            self.config().media_ports.len(),
            offer.labels(),
            state
        );

        self.emit(CallEvent::CallEstablished {
            call_id: call_id.to_string(),
            peer: source,
            offer,
            metadata,
        });
        Ok(())
    }
}

/// The SDP offer and recording metadata carried by an INVITE.
///
/// A plain `application/sdp` body is accepted as an offer without metadata.
fn extract_offer(request: &Message) -> DialogResult<(SessionDescription, Option<String>)> {
    let content_type = request
        .content_type()
        .ok_or_else(|| DialogError::missing_header("Content-Type"))?;

    if BodyKind::from_content_type(content_type) == Some(BodyKind::Sdp) {
        return Ok((parse_sdp(&request.body)?, None));
    }

    let mut parts = extract_parts(&request.body, content_type)?;
    let sdp = parts
        .remove(&BodyKind::Sdp)
        .ok_or_else(|| SipError::malformed_multipart("no application/sdp part"))?;
    let metadata = parts.remove(&BodyKind::RecordingMetadata);
    if metadata.is_none() {
        warn!("INVITE carries no recording metadata");
    }

    Ok((parse_sdp(&sdp)?, metadata))
}
