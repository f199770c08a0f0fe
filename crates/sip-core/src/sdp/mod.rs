//! Session Description Protocol (SDP) for recording sessions
//!
//! A SIPREC offer describes one media stream per recorded participant, each
//! tagged with an `a=label` that the recording metadata refers to
//! ([RFC 7866 Section 7.1.1](https://datatracker.ietf.org/doc/html/rfc7866#section-7.1.1)).
//! This module parses such offers into a [`SessionDescription`] whose media
//! blocks keep their `m=` line order.
//!
//! ```
//! use siprec_sip_core::sdp::parse_sdp;
//!
//! let sdp = parse_sdp(
//!     "v=0\r\n\
//!      o=- 1 1 IN IP4 10.0.0.5\r\n\
//!      s=-\r\n\
//!      c=IN IP4 10.0.0.5\r\n\
//!      t=0 0\r\n\
//!      m=audio 8086 RTP/AVP 0\r\n\
//!      a=rtpmap:0 PCMU/8000\r\n\
//!      a=label:1\r\n",
//! ).unwrap();
//!
//! assert_eq!(sdp.media.len(), 1);
//! assert_eq!(sdp.media[0].rtpmap["0"], "PCMU/8000");
//! assert_eq!(sdp.media[0].label.as_deref(), Some("1"));
//! ```

pub mod parser;
mod types;

pub use parser::parse_sdp;
pub use types::{MediaDescription, SessionDescription, SessionInfo, FLAGS_ATTRIBUTE};
