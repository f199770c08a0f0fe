//! # SIP Via Header Normalization
//!
//! Responses to a request are routed back along the topmost Via. For UDP
//! clients behind NAT, [RFC 3581](https://datatracker.ietf.org/doc/html/rfc3581)
//! lets the client send an empty `rport` parameter; the server then fills in
//! the port, and adds `received`, from the address the datagram actually came
//! from.
//!
//! This module parses one Via value into a [`ViaParams`] set, performs that
//! rewrite, and serializes the parameters in a fixed order:
//!
//! ```text
//! rport ; received ; branch ; <every other parameter, original relative order>
//! ```
//!
//! Some NAT-traversing clients demultiplex responses by string-matching their
//! Via, so the order is applied to every response we send. Unknown parameters
//! are never dropped.
//!
//! ## Example
//!
//! ```rust
//! use siprec_sip_core::normalize_via;
//!
//! let source = "203.0.113.7:40123".parse().unwrap();
//! let via = normalize_via("SIP/2.0/UDP 10.1.1.1:5060;branch=z9hG4bK11;rport", source);
//! assert_eq!(
//!     via,
//!     "SIP/2.0/UDP 10.1.1.1:5060;rport=40123;received=203.0.113.7;branch=z9hG4bK11"
//! );
//! ```

use std::fmt;
use std::net::SocketAddr;

/// A single `name[=value]` Via parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViaParam {
    pub name: String,
    pub value: Option<String>,
}

impl ViaParam {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self { name: name.into(), value }
    }

    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    // Position in the canonical ordering; ties keep their original order
    fn rank(&self) -> u8 {
        if self.is("rport") {
            0
        } else if self.is("received") {
            1
        } else if self.is("branch") {
            2
        } else {
            3
        }
    }
}

impl fmt::Display for ViaParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}

/// One Via value split into its sent-protocol/sent-by part and its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViaParams {
    /// Everything before the first `;`, e.g. `SIP/2.0/UDP host:5060`
    pub sent_by: String,
    pub params: Vec<ViaParam>,
}

impl ViaParams {
    /// Split a Via value. Never fails: a value without parameters yields an
    /// empty parameter list.
    pub fn parse(value: &str) -> Self {
        let (sent_by, raw_params) = match value.split_once(';') {
            Some((sent_by, rest)) => (sent_by, rest),
            None => (value, ""),
        };

        let params = raw_params
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| match p.split_once('=') {
                Some((name, value)) => ViaParam::new(name.trim(), Some(value.trim().to_string())),
                None => ViaParam::new(p, None),
            })
            .collect();

        ViaParams {
            sent_by: sent_by.trim().to_string(),
            params,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ViaParam> {
        self.params.iter().find(|p| p.is(name))
    }

    pub fn branch(&self) -> Option<&str> {
        self.get("branch").and_then(|p| p.value.as_deref())
    }

    /// `rport` present without a value, i.e. the client asks us to fill it in
    pub fn has_bare_rport(&self) -> bool {
        self.get("rport").map_or(false, |p| p.value.is_none())
    }

    /// Fill in `rport` and `received` from the datagram source address.
    ///
    /// Only acts on a bare `rport`. An existing `received` value is replaced:
    /// what the header claims is never trusted over the socket.
    pub fn apply_source(&mut self, source: SocketAddr) {
        if !self.has_bare_rport() {
            return;
        }

        let received = source.ip().to_string();
        if let Some(rport) = self.params.iter_mut().find(|p| p.is("rport")) {
            rport.value = Some(source.port().to_string());
        }
        match self.params.iter_mut().find(|p| p.is("received")) {
            Some(existing) => existing.value = Some(received),
            None => {
                let at = self.params.iter().position(|p| p.is("rport")).map_or(0, |i| i + 1);
                self.params.insert(at, ViaParam::new("received", Some(received)));
            }
        }
    }

    /// Reorder to `rport, received, branch, rest`
    pub fn canonicalize(&mut self) {
        // sort_by_key is stable, which keeps the "rest" in original order
        self.params.sort_by_key(ViaParam::rank);
    }
}

impl fmt::Display for ViaParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sent_by)?;
        for param in &self.params {
            write!(f, ";{}", param)?;
        }
        Ok(())
    }
}

/// Split a Via header line into its hops.
///
/// Several hops may share one line separated by commas (RFC 3261 §7.3.1).
/// Commas inside double quotes do not separate hops. Empty elements are
/// dropped and each hop is trimmed.
///
/// ```rust
/// use siprec_sip_core::split_via_values;
///
/// let hops = split_via_values("SIP/2.0/UDP a;branch=z9hG4bK1, SIP/2.0/UDP b;branch=z9hG4bK2");
/// assert_eq!(hops, vec!["SIP/2.0/UDP a;branch=z9hG4bK1", "SIP/2.0/UDP b;branch=z9hG4bK2"]);
/// ```
pub fn split_via_values(value: &str) -> Vec<&str> {
    let mut hops = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                hops.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    hops.push(&value[start..]);

    hops.into_iter().map(str::trim).filter(|h| !h.is_empty()).collect()
}

fn normalize_hop(hop: &str, source: SocketAddr) -> String {
    let mut via = ViaParams::parse(hop);
    if via.params.is_empty() {
        return hop.to_string();
    }
    via.apply_source(source);
    via.canonicalize();
    via.to_string()
}

/// Rewrite a Via value for use in a response to a datagram from `source`.
///
/// Only the first hop is rewritten. When the value carries several
/// comma-joined hops the later ones are kept verbatim and in order.
pub fn normalize_via(value: &str, source: SocketAddr) -> String {
    let hops = split_via_values(value);
    match hops.split_first() {
        None => value.to_string(),
        Some((first, rest)) => std::iter::once(normalize_hop(first, source))
            .chain(rest.iter().map(|hop| hop.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
