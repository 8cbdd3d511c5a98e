//! Message body framing, following RFC 9112 section 6.3.
//!
//! While the header section is parsed, [`FieldFacts`] records what the framing and connection
//! fields say. At the end of the header [`decide`] combines those facts with the start-line
//! to pick one [`Framing`] and the connection properties of the message.

use std::ops::RangeInclusive;

use http::Method;
use tracing::debug;

use crate::codec::scan::{parse_dec, NumError};
use crate::ensure;
use crate::protocol::{HttpVersion, ParseError};

/// How the end of a message body is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// The message has no body. The message ends with its header section.
    NoBody,
    /// Exactly this many body bytes follow the header section.
    Length(u64),
    /// The body uses the chunked transfer coding.
    Chunked,
    /// The body extends until the connection is closed.
    CloseDelimited,
}

impl Framing {
    /// The declared body length, if the framing has one.
    pub fn content_length(self) -> Option<u64> {
        match self {
            Framing::NoBody => Some(0),
            Framing::Length(n) => Some(n),
            Framing::Chunked | Framing::CloseDelimited => None,
        }
    }
}

/// Response status codes whose messages never carry a body.
const BODYLESS_STATUS: [RangeInclusive<u16>; 3] = [100..=199, 204..=204, 304..=304];

/// Response status codes that, answering a CONNECT request, turn the connection into a tunnel.
const TUNNEL_STATUS: RangeInclusive<u16> = 200..=299;

const SWITCHING_PROTOCOLS: u16 = 101;

/// What the framing and connection related fields of a header section say.
#[derive(Debug, Default, Clone)]
pub(crate) struct FieldFacts {
    content_length: Option<u64>,
    transfer_encoding: bool,
    chunked_last: bool,
    chunked_seen: bool,
    connection_close: bool,
    connection_keep_alive: bool,
    connection_upgrade: bool,
    upgrade: bool,
}

impl FieldFacts {
    /// Records one header field. Fields that do not affect framing are ignored.
    pub(crate) fn observe(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        if name.eq_ignore_ascii_case("content-length") {
            self.observe_content_length(value)
        } else if name.eq_ignore_ascii_case("transfer-encoding") {
            self.observe_transfer_encoding(value)
        } else if name.eq_ignore_ascii_case("connection") {
            for option in list_elements(value) {
                if option.eq_ignore_ascii_case("close") {
                    self.connection_close = true;
                } else if option.eq_ignore_ascii_case("keep-alive") {
                    self.connection_keep_alive = true;
                } else if option.eq_ignore_ascii_case("upgrade") {
                    self.connection_upgrade = true;
                }
            }
            Ok(())
        } else {
            if name.eq_ignore_ascii_case("upgrade") {
                self.upgrade = true;
            }
            Ok(())
        }
    }

    fn observe_content_length(&mut self, value: &str) -> Result<(), ParseError> {
        let length = parse_dec(value.as_bytes()).map_err(|e| match e {
            NumError::Empty => ParseError::invalid_content_length("empty value"),
            NumError::InvalidDigit => ParseError::invalid_content_length(format!("value {value} is not a decimal number")),
            NumError::Overflow => ParseError::invalid_content_length(format!("value {value} overflows")),
        })?;

        match self.content_length {
            Some(first) if first != length => Err(ParseError::ConflictingContentLength { first, second: length }),
            _ => {
                self.content_length = Some(length);
                Ok(())
            }
        }
    }

    /// Several `Transfer-Encoding` fields form one list; only the final coding decides framing.
    fn observe_transfer_encoding(&mut self, value: &str) -> Result<(), ParseError> {
        for coding in list_elements(value) {
            let name = coding.split(';').next().unwrap_or_default().trim_end();
            let chunked = name.eq_ignore_ascii_case("chunked");
            ensure!(!(chunked && self.chunked_seen), ParseError::ambiguous_framing("chunked applied more than once"));
            self.transfer_encoding = true;
            self.chunked_seen |= chunked;
            self.chunked_last = chunked;
        }
        Ok(())
    }
}

/// Non empty, OWS trimmed elements of a comma separated field value.
fn list_elements(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(|element| element.trim_matches([' ', '\t'])).filter(|element| !element.is_empty())
}

/// What the start-line contributes to the framing decision.
#[derive(Debug, Clone)]
pub(crate) enum StartLine<'a> {
    Request { method: &'a Method },
    Response { status: u16, request_method: Option<&'a Method> },
}

/// The outcome of the framing decision for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decision {
    pub(crate) framing: Framing,
    pub(crate) keep_alive: bool,
    pub(crate) upgrade: bool,
}

pub(crate) fn decide(
    facts: &FieldFacts,
    start: &StartLine<'_>,
    version: HttpVersion,
    skip_body: bool,
) -> Result<Decision, ParseError> {
    let is_request = matches!(start, StartLine::Request { .. });

    if facts.transfer_encoding && !facts.chunked_last {
        ensure!(
            facts.content_length.is_none(),
            ParseError::ambiguous_framing("content-length with a transfer-encoding not ending in chunked")
        );
        ensure!(!is_request, ParseError::ambiguous_framing("request transfer-encoding must end in chunked"));
    }

    let mut keep_alive = if version.is_keep_alive_default() {
        !facts.connection_close
    } else {
        facts.connection_keep_alive && !facts.connection_close
    };

    let upgrade = match start {
        StartLine::Request { method } => {
            **method == Method::CONNECT || (facts.upgrade && facts.connection_upgrade)
        }
        StartLine::Response { status, request_method } => {
            *status == SWITCHING_PROTOCOLS
                || (request_method.is_some_and(|m| *m == Method::CONNECT) && TUNNEL_STATUS.contains(status))
        }
    };

    let bodyless = skip_body
        || match start {
            StartLine::Request { .. } => false,
            StartLine::Response { status, request_method } => {
                BODYLESS_STATUS.iter().any(|range| range.contains(status))
                    || request_method.is_some_and(|m| *m == Method::HEAD)
                    || (request_method.is_some_and(|m| *m == Method::CONNECT) && TUNNEL_STATUS.contains(status))
            }
        };

    let framing = if bodyless {
        Framing::NoBody
    } else if facts.chunked_last {
        if facts.content_length.is_some() {
            debug!("chunked transfer-encoding overrides content-length, connection will close");
            keep_alive = false;
        }
        Framing::Chunked
    } else if let Some(length) = facts.content_length {
        if length == 0 { Framing::NoBody } else { Framing::Length(length) }
    } else if is_request {
        Framing::NoBody
    } else {
        Framing::CloseDelimited
    };

    if framing == Framing::CloseDelimited {
        keep_alive = false;
    }

    debug!(?framing, keep_alive, upgrade, "decided message framing");
    Ok(Decision { framing, keep_alive, upgrade })
}
