//! SDP parser
//!
//! [`parse_sdp`] reads a description line by line. Session-level lines fill
//! [`SessionInfo`](super::SessionInfo) until the first `m=` line opens a media
//! block; from then on `c=` and `a=` lines belong to the most recent block.
//! Unknown line types are ignored.

mod line_parser;

pub use line_parser::{parse_media_line, parse_sdp_line, split_attribute, MediaLine};

use tracing::trace;

use super::types::{MediaDescription, SessionDescription, FLAGS_ATTRIBUTE};
use crate::error::{Error, Result};

/// Parse an SDP body.
///
/// Fails with [`Error::SdpParsing`] when an `m=` line has fewer than three
/// fields or a non-numeric port.
pub fn parse_sdp(raw: &str) -> Result<SessionDescription> {
    let mut sdp = SessionDescription::default();

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Ok((_, (kind, value))) = parse_sdp_line(line) else {
            trace!("Ignoring non-SDP line: {}", line);
            continue;
        };

        match kind {
            'v' => sdp.session.version = Some(value.to_string()),
            'o' => sdp.session.origin = Some(value.to_string()),
            's' => sdp.session.name = Some(value.to_string()),
            't' => sdp.session.timing = Some(value.to_string()),
            'c' => match sdp.media.last_mut() {
                Some(media) => media.connection = Some(value.to_string()),
                None => sdp.session.connection = Some(value.to_string()),
            },
            'm' => sdp.media.push(parse_media_description(value)?),
            'a' => match sdp.media.last_mut() {
                Some(media) => apply_media_attribute(media, value),
                None => sdp.session.attributes.push(value.to_string()),
            },
            _ => {}
        }
    }

    Ok(sdp)
}

fn parse_media_description(value: &str) -> Result<MediaDescription> {
    let (_, line) = parse_media_line(value)
        .map_err(|_| Error::SdpParsing(format!("Invalid media line: 'm={}'", value)))?;

    Ok(MediaDescription::new(
        line.media_type,
        line.port,
        line.protocol,
        line.formats.into_iter().map(str::to_string).collect(),
    ))
}

fn apply_media_attribute(media: &mut MediaDescription, value: &str) {
    let (name, data) = split_attribute(value);
    let Some(data) = data else {
        media
            .attributes
            .entry(FLAGS_ATTRIBUTE.to_string())
            .or_default()
            .push(name.to_string());
        return;
    };

    match name {
        "rtpmap" | "fmtp" => {
            if let Some((payload_type, rest)) = data.split_once(' ') {
                let map = if name == "rtpmap" { &mut media.rtpmap } else { &mut media.fmtp };
                map.insert(payload_type.to_string(), rest.trim().to_string());
                return;
            }
        }
        "label" => {
            media.label = Some(data.to_string());
            return;
        }
        _ => {}
    }

    media
        .attributes
        .entry(name.to_string())
        .or_default()
        .push(data.to_string());
}
