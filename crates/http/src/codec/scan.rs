//! Byte classification and number scanning shared by the start-line, field and chunk parsers.
//!
//! All lookup tables are built at compile time.

use std::str;

use crate::ensure;
use crate::protocol::ParseError;

const NOT_A_DIGIT: u8 = 0xFF;

/// Decimal value of each byte, `NOT_A_DIGIT` for non digits.
static DEC_DIGITS: [u8; 256] = digit_table(false);

/// Hexadecimal value of each byte, case-insensitive, `NOT_A_DIGIT` for non digits.
static HEX_DIGITS: [u8; 256] = digit_table(true);

/// `tchar` from RFC 9110 section 5.6.2.
static TOKEN_CHARS: [bool; 256] = token_table();

const fn digit_table(hex: bool) -> [u8; 256] {
    let mut table = [NOT_A_DIGIT; 256];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        table[i] = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' if hex => b - b'a' + 10,
            b'A'..=b'F' if hex => b - b'A' + 10,
            _ => NOT_A_DIGIT,
        };
        i += 1;
    }
    table
}

const fn token_table() -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        table[i] = matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
                | b'0'..=b'9'
                | b'A'..=b'Z'
                | b'a'..=b'z'
        );
        i += 1;
    }
    table
}

#[inline]
pub(crate) fn is_token(b: u8) -> bool {
    TOKEN_CHARS[b as usize]
}

#[inline]
pub(crate) fn is_token_str(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|&b| is_token(b))
}

/// Field values, reason phrases and chunk extensions: HTAB, SP, VCHAR and obs-text.
#[inline]
pub(crate) fn is_text(b: u8) -> bool {
    b == b'\t' || (b >= 0x20 && b != 0x7F)
}

/// Request targets: anything visible, no whitespace or control characters.
#[inline]
pub(crate) fn is_target_char(b: u8) -> bool {
    b > 0x20 && b != 0x7F
}

#[inline]
pub(crate) fn is_ows(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

pub(crate) fn trim_ows(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| !is_ows(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| !is_ows(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

pub(crate) fn trim_ows_start(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| !is_ows(b)).unwrap_or(bytes.len());
    &bytes[start..]
}

/// A line feed that is not preceded by a carriage return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BareLf;

/// Finds the end of the first line in `buf`.
///
/// Returns the length of the line without its CRLF, or `None` when no complete line is buffered.
pub(crate) fn find_line(buf: &[u8]) -> Result<Option<usize>, BareLf> {
    match buf.iter().position(|&b| b == b'\n') {
        Some(lf) if lf > 0 && buf[lf - 1] == b'\r' => Ok(Some(lf - 1)),
        Some(_) => Err(BareLf),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumError {
    Empty,
    InvalidDigit,
    Overflow,
}

fn parse_radix(bytes: &[u8], table: &[u8; 256], radix: u64) -> Result<u64, NumError> {
    ensure!(!bytes.is_empty(), NumError::Empty);
    let mut value: u64 = 0;
    for &b in bytes {
        let digit = table[b as usize];
        ensure!(digit != NOT_A_DIGIT, NumError::InvalidDigit);
        value = value.checked_mul(radix).and_then(|v| v.checked_add(u64::from(digit))).ok_or(NumError::Overflow)?;
    }
    Ok(value)
}

/// Parses `1*DIGIT` as an unsigned 64-bit integer.
pub(crate) fn parse_dec(bytes: &[u8]) -> Result<u64, NumError> {
    parse_radix(bytes, &DEC_DIGITS, 10)
}

/// Parses `1*HEXDIG` as an unsigned 64-bit integer.
pub(crate) fn parse_hex(bytes: &[u8]) -> Result<u64, NumError> {
    parse_radix(bytes, &HEX_DIGITS, 16)
}

#[inline]
pub(crate) fn is_hex_digit(b: u8) -> bool {
    HEX_DIGITS[b as usize] != NOT_A_DIGIT
}

#[inline]
pub(crate) fn dec_digit(b: u8) -> Option<u8> {
    let digit = DEC_DIGITS[b as usize];
    (digit != NOT_A_DIGIT).then_some(digit)
}

/// Parses a complete `name ":" OWS value OWS` line (without CRLF).
pub(crate) fn parse_field(line: &[u8]) -> Result<(&str, &str), ParseError> {
    ensure!(!line.first().is_some_and(|&b| is_ows(b)), ParseError::invalid_header("obsolete line folding"));

    let colon = line.iter().position(|&b| b == b':').ok_or_else(|| ParseError::invalid_header("missing colon"))?;
    let name = &line[..colon];
    ensure!(is_token_str(name), ParseError::invalid_header("invalid field name"));

    let value = trim_ows(&line[colon + 1..]);
    ensure!(value.iter().all(|&b| is_text(b)), ParseError::invalid_header("invalid character in field value"));

    let name = str::from_utf8(name).map_err(|_| ParseError::invalid_header("invalid field name"))?;
    let value = str::from_utf8(value).map_err(|_| ParseError::invalid_header("field value is not utf-8"))?;
    Ok((name, value))
}

/// Parses a complete `HEX-SIZE [";" ext]` line (without CRLF).
///
/// The extension is returned verbatim starting at its `;`, or empty when absent.
pub(crate) fn parse_chunk_line(line: &[u8]) -> Result<(u64, &str), ParseError> {
    let digits = line.iter().position(|&b| !is_hex_digit(b)).unwrap_or(line.len());
    let size = parse_hex(&line[..digits]).map_err(|e| match e {
        NumError::Overflow => ParseError::invalid_chunk("chunk size overflow"),
        NumError::Empty | NumError::InvalidDigit => ParseError::invalid_chunk("missing chunk size"),
    })?;

    let rest = trim_ows_start(&line[digits..]);
    let extension = match rest.first() {
        None => "",
        Some(b';') => {
            ensure!(rest.iter().all(|&b| is_text(b)), ParseError::invalid_chunk("invalid character in chunk extension"));
            str::from_utf8(rest).map_err(|_| ParseError::invalid_chunk("chunk extension is not utf-8"))?
        }
        Some(_) => return Err(ParseError::invalid_chunk("invalid character after chunk size")),
    };
    Ok((size, extension))
}
