//! SDP line parsing utilities
//!
//! Every SDP line has the form `<type>=<value>` where type is a single
//! character ([RFC 8866 Section 5](https://datatracker.ietf.org/doc/html/rfc8866#section-5)).
//! The parsers here use `nom` and work on one line at a time.

use nom::{
    bytes::complete::take_till1,
    character::complete::{anychar, char, digit1, not_line_ending, space0, space1},
    combinator::{map_res, opt},
    sequence::preceded,
    IResult,
};

/// The fields of an `m=` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLine<'a> {
    pub media_type: &'a str,
    pub port: u16,
    pub protocol: &'a str,
    pub formats: Vec<&'a str>,
}

/// Parse an SDP line into its type character and trimmed value
///
/// # Examples
///
/// ```
/// use siprec_sip_core::sdp::parser::parse_sdp_line;
///
/// let (_, (key, value)) = parse_sdp_line("a=rtpmap:96 VP8/90000").unwrap();
/// assert_eq!(key, 'a');
/// assert_eq!(value, "rtpmap:96 VP8/90000");
/// ```
pub fn parse_sdp_line(input: &str) -> IResult<&str, (char, &str)> {
    let (input, key) = anychar(input)?;
    let (input, _) = char('=')(input)?;
    let (input, value) = not_line_ending(input)?;

    let input = input.trim_start_matches(['\r', '\n']);

    Ok((input, (key, value.trim())))
}

fn token(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

/// Parse the value of an `m=` line: `<media> <port>[/<count>] <proto> <fmt>*`
///
/// The optional port count is accepted and discarded.
pub fn parse_media_line(input: &str) -> IResult<&str, MediaLine<'_>> {
    let (input, media_type) = token(input)?;
    let (input, _) = space1(input)?;
    let (input, port) = map_res(digit1, str::parse::<u16>)(input)?;
    let (input, _) = opt(preceded(char('/'), digit1))(input)?;
    let (input, _) = space1(input)?;
    let (input, protocol) = token(input)?;
    let (input, _) = space0(input)?;

    Ok((
        "",
        MediaLine {
            media_type,
            port,
            protocol,
            formats: input.split_whitespace().collect(),
        },
    ))
}

/// Split an attribute value into name and optional data: `rtpmap:0 PCMU/8000`
pub fn split_attribute(value: &str) -> (&str, Option<&str>) {
    match value.split_once(':') {
        Some((name, data)) => (name.trim(), Some(data.trim())),
        None => (value.trim(), None),
    }
}
