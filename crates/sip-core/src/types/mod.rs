//! Core SIP types used by the recording server

pub mod cseq;
pub mod headers;
pub mod message;
pub mod method;
pub mod multipart;
pub mod status;
pub mod via;

pub use cseq::{CSeq, MAX_CSEQ};
pub use headers::{expand_compact_name, names_match, HeaderEntry, Headers};
pub use message::{Message, RequestLine, SIP_VERSION};
pub use method::Method;
pub use multipart::{
    boundary_from_content_type, extract_parts, BodyKind, MultipartBody, Part, APPLICATION_RS_METADATA,
    APPLICATION_SDP,
};
pub use status::StatusCode;
pub use via::{normalize_via, split_via_values, ViaParam, ViaParams};
