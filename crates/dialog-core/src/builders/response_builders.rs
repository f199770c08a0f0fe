//! Response builders
//!
//! Every response copies Via, From, To, Call-ID and CSeq from the request it
//! answers. The topmost Via is the hop the datagram came from and is
//! normalized against the datagram's source address; deeper Via values are
//! copied verbatim.

use std::net::SocketAddr;

use siprec_sip_core::{normalize_via, split_via_values, Message, ResponseBuilder, StatusCode};

use super::{ServerIdentity, ACCEPTED_CONTENT, ALLOWED_METHODS, SUPPORTED_EXTENSIONS};
use crate::errors::{DialogError, DialogResult};

/// Replace or add the `tag` parameter of a From/To value.
///
/// Parameters inside `<...>` belong to the URI and are left alone.
///
/// ```
/// use siprec_dialog_core::builders::with_to_tag;
///
/// assert_eq!(with_to_tag("<sip:srs@10.0.0.1>", "ab12"), "<sip:srs@10.0.0.1>;tag=ab12");
/// assert_eq!(with_to_tag("<sip:srs@10.0.0.1>;tag=old", "ab12"), "<sip:srs@10.0.0.1>;tag=ab12");
/// ```
pub fn with_to_tag(value: &str, tag: &str) -> String {
    let split_at = value.rfind('>').map_or(0, |i| i + 1);
    let (address, params) = value.split_at(split_at);

    let mut out = String::with_capacity(value.len() + tag.len() + 5);
    let mut params = params.split(';');
    // Text before the first ';' is either empty or a bare addr-spec
    out.push_str(address);
    out.push_str(params.next().unwrap_or_default());
    for param in params {
        let name = param.split('=').next().unwrap_or_default().trim();
        if !param.trim().is_empty() && !name.eq_ignore_ascii_case("tag") {
            out.push(';');
            out.push_str(param);
        }
    }
    out.push_str(";tag=");
    out.push_str(tag);
    out
}

/// Via values for a response, one hop per value: topmost normalized, the rest verbatim.
///
/// Hops sent comma-joined on one line are split apart first, so only the hop
/// the datagram came from is ever rewritten.
pub fn response_vias(request: &Message, source: SocketAddr) -> Vec<String> {
    request
        .header_values("Via")
        .iter()
        .flat_map(|line| split_via_values(line))
        .enumerate()
        .map(|(i, hop)| if i == 0 { normalize_via(hop, source) } else { hop.to_string() })
        .collect()
}

fn required<'a>(request: &'a Message, name: &str) -> DialogResult<&'a str> {
    request
        .header(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DialogError::missing_header(name))
}

fn base_response(
    status: StatusCode,
    request: &Message,
    source: SocketAddr,
    to_tag: Option<&str>,
) -> DialogResult<ResponseBuilder> {
    let from = required(request, "From")?;
    let to = required(request, "To")?;
    let call_id = required(request, "Call-ID")?;
    let cseq = request.cseq()?;

    let to = match to_tag {
        Some(tag) => with_to_tag(to, tag),
        None => to.to_string(),
    };

    Ok(ResponseBuilder::new(status)
        .headers("Via", response_vias(request, source))
        .header("From", from)
        .header("To", to)
        .header("Call-ID", call_id)
        .header("CSeq", cseq.to_string()))
}

/// 100 Trying for an INVITE; To is copied without a tag
pub fn trying(request: &Message, source: SocketAddr) -> DialogResult<String> {
    Ok(base_response(StatusCode::Trying, request, source, None)?.build())
}

/// 200 OK answering an INVITE with the given SDP answer
pub fn ok_invite(
    request: &Message,
    source: SocketAddr,
    to_tag: &str,
    identity: &ServerIdentity,
    session_expires: u32,
    sdp_answer: &str,
) -> DialogResult<String> {
    Ok(base_response(StatusCode::Ok, request, source, Some(to_tag))?
        .header("Supported", SUPPORTED_EXTENSIONS)
        .header("Contact", format!("{};+sip.srs", identity.contact()))
        .header("Session-Expires", format!("{};refresher=uas", session_expires))
        .body("application/sdp", sdp_answer)
        .build())
}

/// 200 OK answering OPTIONS, advertising capabilities
pub fn ok_options(
    request: &Message,
    source: SocketAddr,
    to_tag: &str,
    identity: &ServerIdentity,
) -> DialogResult<String> {
    Ok(base_response(StatusCode::Ok, request, source, Some(to_tag))?
        .header("Contact", identity.contact())
        .header("Allow", ALLOWED_METHODS)
        .header("Accept", ACCEPTED_CONTENT)
        .header("Accept-Language", "en")
        .header("Supported", SUPPORTED_EXTENSIONS)
        .header("Server", identity.user_agent.as_str())
        .build())
}

/// 200 OK answering BYE.
///
/// Within a known call `to_tag` is the call's tag; for an unknown call pass
/// `None` and the To header is echoed as received.
pub fn ok_bye(request: &Message, source: SocketAddr, to_tag: Option<&str>) -> DialogResult<String> {
    Ok(base_response(StatusCode::Ok, request, source, to_tag)?.build())
}
