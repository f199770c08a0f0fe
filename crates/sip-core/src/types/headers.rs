//! # SIP Header Storage
//!
//! Parsed messages keep their headers as an ordered list of values per header
//! name. A header that appears once has a single value; a repeated header (two
//! `Via` lines, for instance) accumulates every value in arrival order. Header
//! names keep the order in which they were first seen.
//!
//! Lookups are case-insensitive and understand the compact forms defined in
//! [RFC 3261 Section 7.3.3](https://datatracker.ietf.org/doc/html/rfc3261#section-7.3.3),
//! so `headers.get("Via")` also finds a header sent as `v:`.
//!
//! ```rust
//! use siprec_sip_core::Headers;
//!
//! let mut headers = Headers::new();
//! headers.append("Via", "SIP/2.0/UDP a.example.com;branch=z9hG4bK1");
//! headers.append("v", "SIP/2.0/UDP b.example.com;branch=z9hG4bK2");
//! headers.append("Call-ID", "abc@host");
//!
//! assert_eq!(headers.get_all("via").len(), 2);
//! assert_eq!(headers.get("i"), Some("abc@host"));
//! ```

use std::fmt;

/// Expands a compact header name to its full form.
///
/// Names that are not compact forms are returned as given.
pub fn expand_compact_name(name: &str) -> &str {
    if name.len() != 1 {
        return name;
    }
    match name.as_bytes()[0].to_ascii_lowercase() {
        b'v' => "Via",
        b'f' => "From",
        b't' => "To",
        b'i' => "Call-ID",
        b'm' => "Contact",
        b'l' => "Content-Length",
        b'c' => "Content-Type",
        b'k' => "Supported",
        b's' => "Subject",
        b'e' => "Content-Encoding",
        _ => name,
    }
}

/// Returns true when two header names refer to the same header.
pub fn names_match(a: &str, b: &str) -> bool {
    expand_compact_name(a).eq_ignore_ascii_case(expand_compact_name(b))
}

/// One header name and all of its values, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

impl HeaderEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Ordered multi-valued header map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<HeaderEntry>,
}

impl Headers {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, accumulating into an existing entry for the same name.
    ///
    /// Compact names are stored under their full form.
    pub fn append(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref();
        let value = value.into();
        match self.entries.iter_mut().find(|e| names_match(&e.name, name)) {
            Some(entry) => entry.values.push(value),
            None => self.entries.push(HeaderEntry {
                name: expand_compact_name(name).to_string(),
                values: vec![value],
            }),
        }
    }

    /// First value of a header
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Every value of a header, empty if absent
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|e| names_match(&e.name, name))
            .map(|e| e.values.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| names_match(&e.name, name))
    }

    /// Number of distinct header names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.entries.iter()
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            for value in &entry.values {
                write!(f, "{}: {}\r\n", entry.name, value)?;
            }
        }
        Ok(())
    }
}
