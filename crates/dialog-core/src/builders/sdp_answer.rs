//! SDP answer for a recording session
//!
//! The recorder answers each offered stream with a receive-only audio stream
//! on one of its configured ports, echoing the stream's `a=label` so the
//! recording metadata can still refer to it.

use std::net::IpAddr;

use siprec_sip_core::{SessionDescription, CRLF};
use tracing::warn;

use crate::errors::{DialogError, DialogResult};

/// Build the answer: one stream per entry of `media_ports`.
///
/// Stream *i* copies the label of offer media block *i*. An offer with fewer
/// media blocks than ports is a [`DialogError::LabelIndexMismatch`].
pub fn build_sdp_answer(offer: &SessionDescription, ip: IpAddr, media_ports: &[u16]) -> DialogResult<String> {
    if offer.media.len() < media_ports.len() {
        return Err(DialogError::LabelIndexMismatch {
            required: media_ports.len(),
            offered: offer.media.len(),
        });
    }

    let addr_type = match ip {
        IpAddr::V4(_) => "IP4",
        IpAddr::V6(_) => "IP6",
    };

    let mut lines = vec![
        "v=0".to_string(),
        format!("o=- 0 0 IN {} {}", addr_type, ip),
        "s=SIPREC Server".to_string(),
        format!("c=IN {} {}", addr_type, ip),
        "t=0 0".to_string(),
    ];

    for (index, (port, offered)) in media_ports.iter().zip(&offer.media).enumerate() {
        lines.push(format!("m=audio {} RTP/AVP 0 8", port));
        lines.push("a=rtpmap:0 PCMU/8000".to_string());
        lines.push("a=rtpmap:8 PCMA/8000".to_string());
        match &offered.label {
            Some(label) => lines.push(format!("a=label:{}", label)),
            None => warn!("Offer media block {} has no label", index),
        }
        lines.push("a=recvonly".to_string());
    }

    let mut sdp = lines.join(CRLF);
    sdp.push_str(CRLF);
    Ok(sdp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use siprec_sip_core::parse_sdp;

    const OFFER: &str = "v=0\r\nm=audio 8086 RTP/AVP 0\r\na=label:1\r\nm=audio 8088 RTP/AVP 0\r\na=label:2\r\n";

    #[test]
    fn test_answer_echoes_labels_in_order() {
        let offer = parse_sdp(OFFER).unwrap();
        let answer = build_sdp_answer(&offer, "10.0.0.100".parse().unwrap(), &[10000, 10002]).unwrap();

        assert_eq!(
            answer,
            "v=0\r\n\
             o=- 0 0 IN IP4 10.0.0.100\r\n\
             s=SIPREC Server\r\n\
             c=IN IP4 10.0.0.100\r\n\
             t=0 0\r\n\
             m=audio 10000 RTP/AVP 0 8\r\n\
             a=rtpmap:0 PCMU/8000\r\n\
             a=rtpmap:8 PCMA/8000\r\n\
             a=label:1\r\n\
             a=recvonly\r\n\
             m=audio 10002 RTP/AVP 0 8\r\n\
             a=rtpmap:0 PCMU/8000\r\n\
             a=rtpmap:8 PCMA/8000\r\n\
             a=label:2\r\n\
             a=recvonly\r\n"
        );

        let parsed = parse_sdp(&answer).unwrap();
        assert_eq!(parsed.labels(), vec![Some("1"), Some("2")]);
    }

    #[test]
    fn test_too_few_offered_streams() {
        let offer = parse_sdp("v=0\r\nm=audio 8086 RTP/AVP 0\r\na=label:1\r\n").unwrap();
        let err = build_sdp_answer(&offer, "10.0.0.100".parse().unwrap(), &[10000, 10002]).unwrap_err();
        assert!(matches!(err, DialogError::LabelIndexMismatch { required: 2, offered: 1 }));
    }

    #[test]
    fn test_extra_offered_streams_are_not_answered() {
        let offer = parse_sdp(OFFER).unwrap();
        let answer = build_sdp_answer(&offer, "10.0.0.100".parse().unwrap(), &[10000]).unwrap();
        assert_eq!(parse_sdp(&answer).unwrap().media.len(), 1);
    }

    #[test]
    fn test_unlabeled_stream_omits_label() {
        let offer = parse_sdp("v=0\r\nm=audio 8086 RTP/AVP 0\r\n").unwrap();
        let answer = build_sdp_answer(&offer, "10.0.0.100".parse().unwrap(), &[10000]).unwrap();
        assert!(!answer.contains("a=label"));
        assert!(answer.contains("a=recvonly"));
    }
}
