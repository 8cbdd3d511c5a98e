//! Request-line and status-line parsing.
//!
//! Both lines are split on exactly two single spaces. For the status-line the reason phrase is
//! everything after the second space, so it may contain spaces itself or be empty.

use std::str;

use crate::codec::scan::{dec_digit, is_ows, is_target_char, is_text, is_token_str};
use crate::ensure;
use crate::protocol::{HttpVersion, ParseError};

/// Parses `method SP request-target SP HTTP-version`.
pub(crate) fn parse_request_line(line: &[u8]) -> Result<(&str, &str, HttpVersion), ParseError> {
    reject_leading_whitespace(line)?;

    let mut parts = line.splitn(3, |&b| b == b' ');
    let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::invalid_start_line("request line must have three parts"));
    };

    ensure!(is_token_str(method), ParseError::InvalidMethod);
    ensure!(!target.is_empty() && target.iter().all(|&b| is_target_char(b)), ParseError::InvalidTarget);
    let version = parse_version(version)?;

    // token chars are ascii
    let method = str::from_utf8(method).map_err(|_| ParseError::InvalidMethod)?;
    let target = str::from_utf8(target).map_err(|_| ParseError::InvalidTarget)?;
    Ok((method, target, version))
}

/// Parses `HTTP-version SP status-code SP reason-phrase`.
pub(crate) fn parse_status_line(line: &[u8]) -> Result<(HttpVersion, u16, &str), ParseError> {
    reject_leading_whitespace(line)?;

    let mut parts = line.splitn(3, |&b| b == b' ');
    let (Some(version), Some(status), Some(reason)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::invalid_start_line("status line must have three parts"));
    };

    let version = parse_version(version)?;
    let status = parse_status(status)?;
    ensure!(reason.iter().all(|&b| is_text(b)), ParseError::invalid_start_line("invalid character in reason phrase"));
    let reason = str::from_utf8(reason).map_err(|_| ParseError::invalid_start_line("reason phrase is not utf-8"))?;
    Ok((version, status, reason))
}

fn reject_leading_whitespace(line: &[u8]) -> Result<(), ParseError> {
    match line.first() {
        None => Err(ParseError::invalid_start_line("empty start line")),
        Some(&b) if is_ows(b) => Err(ParseError::invalid_start_line("leading whitespace")),
        Some(_) => Ok(()),
    }
}

/// Exactly `HTTP/<digit>.<digit>`.
fn parse_version(bytes: &[u8]) -> Result<HttpVersion, ParseError> {
    match bytes {
        [b'H', b'T', b'T', b'P', b'/', major, b'.', minor] => match (dec_digit(*major), dec_digit(*minor)) {
            (Some(major), Some(minor)) => Ok(HttpVersion::new(major, minor)),
            _ => Err(ParseError::InvalidVersion),
        },
        _ => Err(ParseError::InvalidVersion),
    }
}

/// Exactly three digits, at least 100.
fn parse_status(bytes: &[u8]) -> Result<u16, ParseError> {
    let [a, b, c] = bytes else {
        return Err(ParseError::InvalidStatus);
    };
    let (Some(a), Some(b), Some(c)) = (dec_digit(*a), dec_digit(*b), dec_digit(*c)) else {
        return Err(ParseError::InvalidStatus);
    };
    let status = u16::from(a) * 100 + u16::from(b) * 10 + u16::from(c);
    ensure!(status >= 100, ParseError::InvalidStatus);
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line() {
        assert_eq!(parse_request_line(b"GET / HTTP/1.1").unwrap(), ("GET", "/", HttpVersion::HTTP_11));
        assert_eq!(
            parse_request_line(b"OPTIONS * HTTP/1.0").unwrap(),
            ("OPTIONS", "*", HttpVersion::HTTP_10)
        );
        assert_eq!(
            parse_request_line(b"CONNECT example.com:443 HTTP/1.1").unwrap(),
            ("CONNECT", "example.com:443", HttpVersion::HTTP_11)
        );
        assert_eq!(
            parse_request_line(b"M-SEARCH /a?b=c&d HTTP/2.0").unwrap(),
            ("M-SEARCH", "/a?b=c&d", HttpVersion::new(2, 0))
        );
    }

    #[test]
    fn request_line_errors() {
        assert!(matches!(parse_request_line(b""), Err(ParseError::InvalidStartLine { .. })));
        assert!(matches!(parse_request_line(b" GET / HTTP/1.1"), Err(ParseError::InvalidStartLine { .. })));
        assert!(matches!(parse_request_line(b"GET /"), Err(ParseError::InvalidStartLine { .. })));
        assert!(matches!(parse_request_line(b"GET  / HTTP/1.1"), Err(ParseError::InvalidTarget)));
        assert!(matches!(parse_request_line(b"GET / HTTP/1.1 "), Err(ParseError::InvalidVersion)));
        assert!(matches!(parse_request_line(b"GET /a b HTTP/1.1"), Err(ParseError::InvalidVersion)));
        assert!(matches!(parse_request_line(b"G(T / HTTP/1.1"), Err(ParseError::InvalidMethod)));
        assert!(matches!(parse_request_line(b"GET /\x7f HTTP/1.1"), Err(ParseError::InvalidTarget)));
        assert!(matches!(parse_request_line(b"GET /\xff HTTP/1.1"), Err(ParseError::InvalidTarget)));
        assert!(matches!(parse_request_line(b"GET / HTTP/11"), Err(ParseError::InvalidVersion)));
        assert!(matches!(parse_request_line(b"GET / http/1.1"), Err(ParseError::InvalidVersion)));
        assert!(matches!(parse_request_line(b"GET / HTTP/1.12"), Err(ParseError::InvalidVersion)));
    }

    #[test]
    fn status_line() {
        assert_eq!(parse_status_line(b"HTTP/1.1 200 OK").unwrap(), (HttpVersion::HTTP_11, 200, "OK"));
        assert_eq!(
            parse_status_line(b"HTTP/1.0 404 Not Found").unwrap(),
            (HttpVersion::HTTP_10, 404, "Not Found")
        );
        assert_eq!(parse_status_line(b"HTTP/1.1 204 ").unwrap(), (HttpVersion::HTTP_11, 204, ""));
        assert_eq!(
            parse_status_line(b"HTTP/1.1 500 Internal  Server\tError").unwrap(),
            (HttpVersion::HTTP_11, 500, "Internal  Server\tError")
        );
    }

    #[test]
    fn status_line_errors() {
        assert!(matches!(parse_status_line(b"HTTP/1.1 200"), Err(ParseError::InvalidStartLine { .. })));
        assert!(matches!(parse_status_line(b"\tHTTP/1.1 200 OK"), Err(ParseError::InvalidStartLine { .. })));
        assert!(matches!(parse_status_line(b"HTTP/1.1 099 Low"), Err(ParseError::InvalidStatus)));
        assert!(matches!(parse_status_line(b"HTTP/1.1 20 OK"), Err(ParseError::InvalidStatus)));
        assert!(matches!(parse_status_line(b"HTTP/1.1 2000 OK"), Err(ParseError::InvalidStatus)));
        assert!(matches!(parse_status_line(b"HTTP/1.1 2x0 OK"), Err(ParseError::InvalidStatus)));
        assert!(matches!(parse_status_line(b"HTTP/x.1 200 OK"), Err(ParseError::InvalidVersion)));
        assert!(matches!(parse_status_line(b"HTTP/1.1 200 O\x01K"), Err(ParseError::InvalidStartLine { .. })));
    }
}
