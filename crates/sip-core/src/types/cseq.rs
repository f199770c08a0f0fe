//! The CSeq header: a sequence number and the method it belongs to.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use super::method::Method;

/// Largest sequence number a CSeq may carry (must be below 2**31).
pub const MAX_CSEQ: u32 = (1 << 31) - 1;

/// Parsed `CSeq` header value, e.g. `101 INVITE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CSeq {
    pub seq: u32,
    pub method: Method,
}

impl CSeq {
    pub fn new(seq: u32, method: Method) -> Self {
        Self { seq, method }
    }

    /// The CSeq for the next request in this sequence space, using `method`.
    pub fn next(&self, method: Method) -> Result<CSeq> {
        if self.seq >= MAX_CSEQ {
            return Err(Error::malformed_message(format!(
                "CSeq {} cannot be incremented",
                self.seq
            )));
        }
        Ok(CSeq::new(self.seq + 1, method))
    }
}

impl FromStr for CSeq {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let seq = parts
            .next()
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n <= MAX_CSEQ)
            .ok_or_else(|| Error::malformed_message(format!("Invalid CSeq number in '{}'", s)))?;
        let method = parts
            .next()
            .map(Method::from)
            .ok_or_else(|| Error::malformed_message(format!("CSeq '{}' has no method", s)))?;
        Ok(CSeq { seq, method })
    }
}

impl fmt::Display for CSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.seq, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cseq() {
        let cseq: CSeq = "101 INVITE".parse().unwrap();
        assert_eq!(cseq.seq, 101);
        assert_eq!(cseq.method, Method::Invite);
        assert_eq!(cseq.to_string(), "101 INVITE");

        let cseq: CSeq = "  7   BYE ".parse().unwrap();
        assert_eq!(cseq, CSeq::new(7, Method::Bye));
    }

    #[test]
    fn test_parse_cseq_rejects_garbage() {
        assert!("INVITE".parse::<CSeq>().is_err());
        assert!("12".parse::<CSeq>().is_err());
        assert!("".parse::<CSeq>().is_err());
        assert!("4294967295 INVITE".parse::<CSeq>().is_err());
    }

    #[test]
    fn test_next_increments_by_one() {
        let invite = CSeq::new(101, Method::Invite);
        assert_eq!(invite.next(Method::Bye).unwrap(), CSeq::new(102, Method::Bye));
        assert!(CSeq::new(MAX_CSEQ, Method::Invite).next(Method::Bye).is_err());
    }
}
