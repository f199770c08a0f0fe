//! Server-initiated requests
//!
//! The only request the recorder originates is the BYE that ends a call after
//! the recording window. It is built from the stored INVITE with the roles
//! reversed: our To becomes From (carrying our tag) and the caller's From
//! becomes To.

use siprec_sip_core::{Method, RequestBuilder};
use uuid::Uuid;

use super::response_builders::with_to_tag;
use super::ServerIdentity;
use crate::dialog::CallSession;
use crate::errors::{DialogError, DialogResult};

/// RFC 3261 magic cookie prefix for branch parameters
const BRANCH_PREFIX: &str = "z9hG4bK";

/// Generate a fresh Via branch
pub fn generate_branch() -> String {
    format!("{}{}", BRANCH_PREFIX, Uuid::new_v4().simple())
}

/// Where in-dialog requests go: the INVITE's Contact URI, else the peer address
pub fn remote_target(session: &CallSession) -> String {
    session
        .invite
        .header("Contact")
        .and_then(contact_uri)
        .unwrap_or_else(|| format!("sip:{}", session.peer))
}

fn contact_uri(contact: &str) -> Option<String> {
    let uri = match (contact.find('<'), contact.find('>')) {
        (Some(start), Some(end)) if start < end => &contact[start + 1..end],
        _ => contact.split(';').next().unwrap_or_default(),
    };
    let uri = uri.trim();
    if uri.is_empty() || uri == "*" {
        None
    } else {
        Some(uri.to_string())
    }
}

/// Build the BYE that tears down `session`; its CSeq is the INVITE's plus one
pub fn bye_request(session: &CallSession, identity: &ServerIdentity) -> DialogResult<String> {
    let invite = &session.invite;
    let from = invite.header("To").ok_or_else(|| DialogError::missing_header("To"))?;
    let to = invite.header("From").ok_or_else(|| DialogError::missing_header("From"))?;
    let cseq = invite.cseq()?.next(Method::Bye)?;

    Ok(RequestBuilder::new(Method::Bye, remote_target(session))
        .header(
            "Via",
            format!("SIP/2.0/UDP {};rport;branch={}", identity.host_port(), generate_branch()),
        )
        .header("Max-Forwards", "70")
        .header("From", with_to_tag(from, &session.to_tag))
        .header("To", to)
        .header("Call-ID", session.call_id.as_str())
        .header("CSeq", cseq.to_string())
        .header("User-Agent", identity.user_agent.as_str())
        .build())
}
