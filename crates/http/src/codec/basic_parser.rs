//! The HTTP/1.x wire format state machine.
//!
//! [`BasicParser`] consumes bytes incrementally and reports structure to a [`Handler`]. It never
//! buffers input: every call consumes the longest prefix that forms complete tokens (start-line,
//! field lines, chunk lines) plus any body bytes, and reports how much it consumed. The caller
//! keeps the unconsumed tail and presents it again, extended with new input, on the next call.
//!
//! # Example
//!
//! ```
//! use micro_http_parser::codec::{BasicParser, Handler, Status};
//! use micro_http_parser::protocol::ParseError;
//!
//! #[derive(Default)]
//! struct Hosts(Vec<String>);
//!
//! impl Handler for Hosts {
//!     fn on_field(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
//!         if name.eq_ignore_ascii_case("host") {
//!             self.0.push(value.to_string());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut parser = BasicParser::request(Hosts::default());
//! let input = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
//!
//! let progress = parser.write(&input[..20]).unwrap();
//! assert_eq!(progress.consumed, 16);
//! assert_eq!(progress.status, Status::NeedMore);
//!
//! let progress = parser.write(&input[16..]).unwrap();
//! assert_eq!(progress.status, Status::MessageComplete);
//! assert_eq!(parser.handler().0, ["example.com"]);
//! ```

use http::Method;
use tracing::{debug, trace};

use crate::codec::framing::{self, FieldFacts, Framing, StartLine};
use crate::codec::scan::{self, BareLf};
use crate::codec::start_line::{parse_request_line, parse_status_line};
use crate::codec::Handler;
use crate::ensure;
use crate::protocol::{HttpVersion, ParseError, ParserConfig};

/// Longest accepted chunk size line, extensions included.
const MAX_CHUNK_LINE_BYTES: usize = 4 * 1024;

/// Where a parser stands after a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// All presented bytes that form complete tokens were consumed, more input is required.
    NeedMore,
    /// The header section is complete. Only returned by [`BasicParser::write_header`].
    HeaderComplete,
    /// The message is complete. Any unconsumed input belongs to whatever follows it.
    MessageComplete,
}

/// The result of one write call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes consumed from the front of the input.
    pub consumed: usize,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartLine,
    Fields,
    /// Header done, `on_body_begin` not delivered yet.
    BodyPending(Framing),
    Body { remain: u64 },
    ChunkSize,
    ChunkData { remain: u64 },
    /// CRLF after chunk data.
    ChunkEnd,
    Trailers,
    CloseDelimited,
    Complete,
    Failed,
}

/// Incremental parser for one HTTP/1.x request or response.
///
/// A parser handles exactly one message. Once it completes or fails, every further call returns
/// [`ParseError::Exhausted`]; parse the next message on the same connection with a new parser.
#[derive(Debug)]
pub struct BasicParser<H> {
    handler: H,
    config: ParserConfig,
    is_request: bool,
    state: State,

    facts: FieldFacts,
    /// Bytes and fields of the header or trailer section being parsed.
    section_bytes: usize,
    section_fields: usize,

    version: HttpVersion,
    method: Method,
    status: u16,
    request_method: Option<Method>,
    skip_body: bool,

    framing: Option<Framing>,
    keep_alive: bool,
    upgrade: bool,

    body_bytes: u64,
    chunk_total: u64,
}

impl<H: Handler> BasicParser<H> {
    pub fn request(handler: H) -> Self {
        Self::new(handler, true)
    }

    pub fn response(handler: H) -> Self {
        Self::new(handler, false)
    }

    pub(crate) fn new(handler: H, is_request: bool) -> Self {
        Self {
            handler,
            config: ParserConfig::default(),
            is_request,
            state: State::StartLine,
            facts: FieldFacts::default(),
            section_bytes: 0,
            section_fields: 0,
            version: HttpVersion::default(),
            method: Method::GET,
            status: 0,
            request_method: None,
            skip_body: false,
            framing: None,
            keep_alive: false,
            upgrade: false,
            body_bytes: 0,
            chunk_total: 0,
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Treats the message as having no body regardless of its framing fields.
    ///
    /// Takes effect only when set before the header section completes.
    pub fn skip_body(&mut self, skip: bool) {
        self.skip_body = skip;
    }

    /// Records the method of the request a response answers. `HEAD` and `CONNECT` change how
    /// the response is framed. Takes effect only when set before the header section completes.
    pub fn set_request_method(&mut self, method: Method) {
        self.request_method = Some(method);
    }

    /// Parses as much of `input` as possible, through the end of the message.
    ///
    /// Errors are terminal: the parser is failed afterwards and no consumed count is reported,
    /// since the message and the rest of the stream cannot be trusted.
    pub fn write(&mut self, input: &[u8]) -> Result<Progress, ParseError> {
        self.drive(input, false)
    }

    /// Like [`write`](Self::write), but stops at the end of the header section.
    ///
    /// Body bytes following the header are left unconsumed and `on_body_begin` is not delivered,
    /// so the handler or body reader can still be chosen based on the header.
    pub fn write_header(&mut self, input: &[u8]) -> Result<Progress, ParseError> {
        self.drive(input, true)
    }

    /// Signals that the input stream ended.
    ///
    /// Completes a close-delimited body. Anywhere else the message is truncated and this fails
    /// with [`ParseError::PartialMessage`].
    pub fn write_eof(&mut self) -> Result<Status, ParseError> {
        self.ensure_active()?;
        let result = self.finish_at_eof();
        self.fail_on_error(result)
    }

    /// Asks the handler for a region of up to `limit` body bytes to fill directly.
    ///
    /// The region is bounded by [`remain`](Self::remain). Direct writes apply to the body data of
    /// fixed-length bodies, the current chunk of chunked bodies and close-delimited bodies.
    pub fn prepare_body(&mut self, limit: usize) -> Result<&mut [u8], ParseError> {
        self.ensure_active()?;
        if let State::BodyPending(framing) = self.state {
            let result = self.begin_body(framing);
            self.fail_on_error(result)?;
        }

        let remain = self.remain();
        ensure!(remain > 0 && limit > 0, ParseError::NoBodyRemaining);
        let size = usize::try_from(remain).map_or(limit, |remain| remain.min(limit));
        self.handler.on_body_prepare(size)
    }

    /// Finalizes `size` bytes of the region returned by the last [`prepare_body`](Self::prepare_body).
    pub fn commit_body(&mut self, size: usize) -> Result<Status, ParseError> {
        self.ensure_active()?;
        ensure!(!matches!(self.state, State::BodyPending(_)), ParseError::NoBodyRemaining);
        let remain = self.remain();
        ensure!(remain > 0 && size as u64 <= remain, ParseError::NoBodyRemaining);
        let result = self.commit_region(size);
        self.fail_on_error(result)
    }
}

impl<H> BasicParser<H> {
    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn is_request(&self) -> bool {
        self.is_request
    }

    /// The version of the start-line, HTTP/1.1 until it is parsed.
    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn is_header_done(&self) -> bool {
        self.framing.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Complete
    }

    pub fn is_failed(&self) -> bool {
        self.state == State::Failed
    }

    /// The body framing, known once the header section is complete.
    pub fn framing(&self) -> Option<Framing> {
        self.framing
    }

    /// Whether the connection may carry another message after this one.
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// Whether the connection switches protocol after this message.
    pub fn upgrade(&self) -> bool {
        self.upgrade
    }

    /// Whether the body ends only when the input stream ends.
    pub fn need_eof(&self) -> bool {
        self.framing == Some(Framing::CloseDelimited)
    }

    /// Length of the body this message carries, when the framing declares one.
    pub fn content_length(&self) -> Option<u64> {
        self.framing.and_then(Framing::content_length)
    }

    pub fn is_chunked(&self) -> bool {
        self.framing == Some(Framing::Chunked)
    }

    /// Body bytes that may be written before the parser needs to see framing again.
    ///
    /// The remaining length of a fixed-length body or of the current chunk, `u64::MAX` for a
    /// close-delimited body and 0 everywhere else.
    pub fn remain(&self) -> u64 {
        match self.state {
            State::Body { remain } | State::ChunkData { remain } | State::BodyPending(Framing::Length(remain)) => remain,
            State::CloseDelimited | State::BodyPending(Framing::CloseDelimited) => u64::MAX,
            _ => 0,
        }
    }

    /// Whether the body has not started yet, so the handler may still be replaced.
    pub(crate) fn before_body(&self) -> bool {
        matches!(self.state, State::StartLine | State::Fields | State::BodyPending(_))
    }

    pub(crate) fn map_handler<H2>(self, f: impl FnOnce(H) -> H2) -> BasicParser<H2> {
        BasicParser {
            handler: f(self.handler),
            config: self.config,
            is_request: self.is_request,
            state: self.state,
            facts: self.facts,
            section_bytes: self.section_bytes,
            section_fields: self.section_fields,
            version: self.version,
            method: self.method,
            status: self.status,
            request_method: self.request_method,
            skip_body: self.skip_body,
            framing: self.framing,
            keep_alive: self.keep_alive,
            upgrade: self.upgrade,
            body_bytes: self.body_bytes,
            chunk_total: self.chunk_total,
        }
    }

    fn ensure_active(&self) -> Result<(), ParseError> {
        ensure!(!matches!(self.state, State::Complete | State::Failed), ParseError::Exhausted);
        Ok(())
    }

    fn fail_on_error<T>(&mut self, result: Result<T, ParseError>) -> Result<T, ParseError> {
        if let Err(e) = &result {
            debug!(cause = %e, "parse failed");
            self.state = State::Failed;
        }
        result
    }
}

impl<H: Handler> BasicParser<H> {
    fn drive(&mut self, input: &[u8], header_only: bool) -> Result<Progress, ParseError> {
        self.ensure_active()?;
        let mut consumed = 0;
        let result = self.parse(input, &mut consumed, header_only);
        let status = self.fail_on_error(result)?;
        trace!(consumed, ?status, "consumed input");
        Ok(Progress { consumed, status })
    }

    fn parse(&mut self, input: &[u8], consumed: &mut usize, header_only: bool) -> Result<Status, ParseError> {
        loop {
            if header_only && self.is_header_done() && self.state != State::Complete {
                return Ok(Status::HeaderComplete);
            }

            let rest = &input[*consumed..];
            let advanced = match self.state {
                State::StartLine => self.parse_start_line(rest)?,
                State::Fields => self.parse_field_line(rest, false)?,
                State::BodyPending(framing) => {
                    if rest.is_empty() {
                        None
                    } else {
                        self.begin_body(framing)?;
                        Some(0)
                    }
                }
                State::Body { .. } | State::ChunkData { .. } | State::CloseDelimited => self.parse_data(rest)?,
                State::ChunkSize => self.parse_chunk_size(rest)?,
                State::ChunkEnd => self.parse_chunk_end(rest)?,
                State::Trailers => self.parse_field_line(rest, true)?,
                State::Complete => return Ok(Status::MessageComplete),
                State::Failed => return Err(ParseError::Exhausted),
            };

            match advanced {
                Some(n) => *consumed += n,
                None => return Ok(Status::NeedMore),
            }
        }
    }

    /// Finds the next line of the header or trailer section, enforcing the section size limit.
    fn next_section_line(&mut self, rest: &[u8]) -> Result<Option<usize>, ParseError> {
        let max = self.config.max_header_bytes();
        match scan::find_line(rest) {
            Ok(Some(len)) => {
                self.section_bytes += len + 2;
                ensure!(self.section_bytes <= max, ParseError::too_large_header(self.section_bytes, max));
                Ok(Some(len))
            }
            Ok(None) => {
                let pending = self.section_bytes + rest.len();
                ensure!(pending <= max, ParseError::too_large_header(pending, max));
                Ok(None)
            }
            Err(BareLf) if self.state == State::StartLine => Err(ParseError::invalid_start_line("bare LF line terminator")),
            Err(BareLf) => Err(ParseError::invalid_header("bare LF line terminator")),
        }
    }

    fn parse_start_line(&mut self, rest: &[u8]) -> Result<Option<usize>, ParseError> {
        let Some(len) = self.next_section_line(rest)? else {
            return Ok(None);
        };
        let line = &rest[..len];

        if self.is_request {
            let (method, target, version) = parse_request_line(line)?;
            trace!(method, target, %version, "parsed request line");
            self.method = Method::from_bytes(method.as_bytes()).map_err(|_| ParseError::InvalidMethod)?;
            self.version = version;
            self.handler.on_request(method, target, version)?;
        } else {
            let (version, status, reason) = parse_status_line(line)?;
            trace!(status, reason, %version, "parsed status line");
            self.status = status;
            self.version = version;
            self.handler.on_response(status, reason, version)?;
        }

        self.state = State::Fields;
        Ok(Some(len + 2))
    }

    fn parse_field_line(&mut self, rest: &[u8], trailer: bool) -> Result<Option<usize>, ParseError> {
        let Some(len) = self.next_section_line(rest)? else {
            return Ok(None);
        };

        if len == 0 {
            if trailer {
                self.end_message()?;
            } else {
                self.end_header()?;
            }
            return Ok(Some(2));
        }

        let (name, value) = scan::parse_field(&rest[..len])?;
        self.section_fields += 1;
        let max = self.config.max_headers();
        ensure!(self.section_fields <= max, ParseError::too_many_headers(max));

        if trailer {
            self.handler.on_trailer(name, value)?;
        } else {
            self.facts.observe(name, value)?;
            self.handler.on_field(name, value)?;
        }
        Ok(Some(len + 2))
    }

    fn end_header(&mut self) -> Result<(), ParseError> {
        let start = if self.is_request {
            StartLine::Request { method: &self.method }
        } else {
            StartLine::Response { status: self.status, request_method: self.request_method.as_ref() }
        };
        let decision = framing::decide(&self.facts, &start, self.version, self.skip_body)?;

        if let (Framing::Length(length), Some(max)) = (decision.framing, self.config.max_body_bytes()) {
            ensure!(length <= max, ParseError::too_large_body(length, max));
        }

        self.framing = Some(decision.framing);
        self.keep_alive = decision.keep_alive;
        self.upgrade = decision.upgrade;
        trace!(header_bytes = self.section_bytes, fields = self.section_fields, "parsed header section");
        self.handler.on_header_end()?;

        match decision.framing {
            Framing::NoBody => self.end_message(),
            framing => {
                self.state = State::BodyPending(framing);
                Ok(())
            }
        }
    }

    fn begin_body(&mut self, framing: Framing) -> Result<(), ParseError> {
        let hint = match framing {
            Framing::Length(length) => Some(length),
            Framing::NoBody | Framing::Chunked | Framing::CloseDelimited => None,
        };
        self.handler.on_body_begin(hint)?;
        trace!(?framing, "body begins");

        self.state = match framing {
            Framing::NoBody => return self.end_body(),
            Framing::Length(remain) => State::Body { remain },
            Framing::Chunked => State::ChunkSize,
            Framing::CloseDelimited => State::CloseDelimited,
        };
        Ok(())
    }

    fn parse_data(&mut self, rest: &[u8]) -> Result<Option<usize>, ParseError> {
        if rest.is_empty() {
            return Ok(None);
        }
        let n = usize::try_from(self.remain()).map_or(rest.len(), |remain| remain.min(rest.len()));
        self.account_body(n)?;
        self.handler.on_body(&rest[..n])?;
        self.advance_body(n)?;
        Ok(Some(n))
    }

    fn commit_region(&mut self, size: usize) -> Result<Status, ParseError> {
        self.account_body(size)?;
        self.handler.on_body_commit(size)?;
        self.advance_body(size)?;
        Ok(if self.state == State::Complete { Status::MessageComplete } else { Status::NeedMore })
    }

    fn account_body(&mut self, n: usize) -> Result<(), ParseError> {
        self.body_bytes += n as u64;
        if let (State::CloseDelimited, Some(max)) = (self.state, self.config.max_body_bytes()) {
            ensure!(self.body_bytes <= max, ParseError::too_large_body(self.body_bytes, max));
        }
        Ok(())
    }

    /// Moves past `n` body bytes. `n` never exceeds [`remain`](Self::remain).
    fn advance_body(&mut self, n: usize) -> Result<(), ParseError> {
        match self.state {
            State::Body { remain } => match remain - n as u64 {
                0 => self.end_body()?,
                remain => self.state = State::Body { remain },
            },
            State::ChunkData { remain } => match remain - n as u64 {
                0 => self.state = State::ChunkEnd,
                remain => self.state = State::ChunkData { remain },
            },
            _ => {}
        }
        Ok(())
    }

    fn parse_chunk_size(&mut self, rest: &[u8]) -> Result<Option<usize>, ParseError> {
        let len = match scan::find_line(rest) {
            Ok(Some(len)) => len,
            Ok(None) => {
                let pending = rest.strip_suffix(b"\r").unwrap_or(rest);
                ensure!(pending.len() <= MAX_CHUNK_LINE_BYTES, ParseError::invalid_chunk("chunk size line too long"));
                return Ok(None);
            }
            Err(BareLf) => return Err(ParseError::invalid_chunk("bare LF line terminator")),
        };
        ensure!(len <= MAX_CHUNK_LINE_BYTES, ParseError::invalid_chunk("chunk size line too long"));

        let (size, extension) = scan::parse_chunk_line(&rest[..len])?;
        self.chunk_total =
            self.chunk_total.checked_add(size).ok_or_else(|| ParseError::invalid_chunk("total chunk size overflow"))?;
        if let Some(max) = self.config.max_body_bytes() {
            ensure!(self.chunk_total <= max, ParseError::too_large_body(self.chunk_total, max));
        }

        trace!(size, extension, "parsed chunk header");
        self.handler.on_chunk(size, extension)?;

        if size == 0 {
            self.handler.on_body_end()?;
            self.section_bytes = 0;
            self.section_fields = 0;
            self.state = State::Trailers;
        } else {
            self.state = State::ChunkData { remain: size };
        }
        Ok(Some(len + 2))
    }

    fn parse_chunk_end(&mut self, rest: &[u8]) -> Result<Option<usize>, ParseError> {
        match rest {
            [] | [b'\r'] => Ok(None),
            [b'\r', b'\n', ..] => {
                self.state = State::ChunkSize;
                Ok(Some(2))
            }
            _ => Err(ParseError::invalid_chunk("missing CRLF after chunk data")),
        }
    }

    fn end_body(&mut self) -> Result<(), ParseError> {
        self.handler.on_body_end()?;
        self.end_message()
    }

    fn end_message(&mut self) -> Result<(), ParseError> {
        self.handler.on_message_end()?;
        self.state = State::Complete;
        debug!(keep_alive = self.keep_alive, upgrade = self.upgrade, "message complete");
        Ok(())
    }

    fn finish_at_eof(&mut self) -> Result<Status, ParseError> {
        if let State::BodyPending(framing @ Framing::CloseDelimited) = self.state {
            self.begin_body(framing)?;
        }
        ensure!(self.state == State::CloseDelimited, ParseError::PartialMessage);
        self.end_body()?;
        Ok(Status::MessageComplete)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    /// Records every callback as one line of text.
    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<String>,
        region: Vec<u8>,
    }

    impl Handler for Recorder {
        fn on_request(&mut self, method: &str, target: &str, version: HttpVersion) -> Result<(), ParseError> {
            self.events.push(format!("request {method} {target} {version}"));
            Ok(())
        }

        fn on_response(&mut self, status: u16, reason: &str, version: HttpVersion) -> Result<(), ParseError> {
            self.events.push(format!("response {status} {reason} {version}"));
            Ok(())
        }

        fn on_field(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
            self.events.push(format!("field {name}={value}"));
            Ok(())
        }

        fn on_header_end(&mut self) -> Result<(), ParseError> {
            self.events.push("header end".into());
            Ok(())
        }

        fn on_body_begin(&mut self, content_length: Option<u64>) -> Result<(), ParseError> {
            self.events.push(format!("body begin {content_length:?}"));
            Ok(())
        }

        fn on_chunk(&mut self, size: u64, extension: &str) -> Result<(), ParseError> {
            self.events.push(format!("chunk {size} {extension:?}"));
            Ok(())
        }

        fn on_body(&mut self, data: &[u8]) -> Result<(), ParseError> {
            self.events.push(format!("body {}", String::from_utf8_lossy(data)));
            Ok(())
        }

        fn on_body_prepare(&mut self, size: usize) -> Result<&mut [u8], ParseError> {
            self.region = vec![0; size];
            Ok(&mut self.region)
        }

        fn on_body_commit(&mut self, size: usize) -> Result<(), ParseError> {
            self.events.push(format!("commit {}", String::from_utf8_lossy(&self.region[..size])));
            Ok(())
        }

        fn on_body_end(&mut self) -> Result<(), ParseError> {
            self.events.push("body end".into());
            Ok(())
        }

        fn on_trailer(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
            self.events.push(format!("trailer {name}={value}"));
            Ok(())
        }

        fn on_message_end(&mut self) -> Result<(), ParseError> {
            self.events.push("message end".into());
            Ok(())
        }
    }

    fn crlf(text: &str) -> Vec<u8> {
        text.replace('\n', "\r\n").into_bytes()
    }

    #[test]
    fn request_with_length() {
        let input = crlf(indoc! {"
            POST /upload HTTP/1.1
            Host: example.com
            Content-Length: 5

            hello"});

        let mut parser = BasicParser::request(Recorder::default());
        let progress = parser.write(&input).unwrap();
        assert_eq!(progress, Progress { consumed: input.len(), status: Status::MessageComplete });
        assert!(parser.is_done());
        assert!(parser.keep_alive());
        assert_eq!(parser.content_length(), Some(5));
        assert_eq!(
            parser.handler().events,
            [
                "request POST /upload HTTP/1.1",
                "field Host=example.com",
                "field Content-Length=5",
                "header end",
                "body begin Some(5)",
                "body hello",
                "body end",
                "message end",
            ]
        );
    }

    #[test]
    fn chunked_response_with_trailers() {
        let input = crlf(indoc! {"
            HTTP/1.1 200 OK
            Transfer-Encoding: chunked

            5;lang=en
            hello
            0
            Expires: never

            "});

        let mut parser = BasicParser::response(Recorder::default());
        let progress = parser.write(&input).unwrap();
        assert_eq!(progress, Progress { consumed: input.len(), status: Status::MessageComplete });
        assert!(parser.is_chunked());
        assert_eq!(
            parser.handler().events,
            [
                "response 200 OK HTTP/1.1",
                "field Transfer-Encoding=chunked",
                "header end",
                "body begin None",
                "chunk 5 \";lang=en\"",
                "body hello",
                "chunk 0 \"\"",
                "body end",
                "trailer Expires=never",
                "message end",
            ]
        );
    }

    #[test]
    fn bodyless_request_completes_at_header() {
        let input = b"GET / HTTP/1.1\r\n\r\nGET /next HTTP/1.1\r\n\r\n";
        let mut parser = BasicParser::request(Recorder::default());
        let progress = parser.write(input).unwrap();
        assert_eq!(progress, Progress { consumed: 18, status: Status::MessageComplete });
        assert_eq!(parser.handler().events, ["request GET / HTTP/1.1", "header end", "message end"]);
    }

    #[test]
    fn consumes_only_complete_tokens() {
        let mut parser = BasicParser::request(Recorder::default());
        assert_eq!(parser.write(b"GET / HT").unwrap(), Progress { consumed: 0, status: Status::NeedMore });
        assert_eq!(parser.write(b"GET / HTTP/1.1\r\nHost: a").unwrap(), Progress { consumed: 16, status: Status::NeedMore });
        assert_eq!(parser.write(b"Host: a\r").unwrap(), Progress { consumed: 0, status: Status::NeedMore });
        assert_eq!(parser.write(b"Host: a\r\n\r\n").unwrap(), Progress { consumed: 11, status: Status::MessageComplete });
    }

    #[test]
    fn body_begin_is_lazy() {
        let input = crlf(indoc! {"
            PUT /a HTTP/1.1
            Content-Length: 3

            abc"});
        let header_len = input.len() - 3;

        let mut parser = BasicParser::request(Recorder::default());
        let progress = parser.write(&input[..header_len]).unwrap();
        assert_eq!(progress, Progress { consumed: header_len, status: Status::NeedMore });
        assert!(parser.is_header_done());
        assert_eq!(parser.remain(), 3);
        assert_eq!(parser.handler().events.last().map(String::as_str), Some("header end"));

        let progress = parser.write(&input[header_len..]).unwrap();
        assert_eq!(progress, Progress { consumed: 3, status: Status::MessageComplete });
        assert!(parser.handler().events.contains(&"body begin Some(3)".to_string()));
    }

    #[test]
    fn write_header_stops_before_body() {
        let input = b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi";
        let mut parser = BasicParser::request(Recorder::default());

        let progress = parser.write_header(input).unwrap();
        assert_eq!(progress, Progress { consumed: input.len() - 2, status: Status::HeaderComplete });
        let progress = parser.write_header(&input[progress.consumed..]).unwrap();
        assert_eq!(progress, Progress { consumed: 0, status: Status::HeaderComplete });

        let progress = parser.write(b"hi").unwrap();
        assert_eq!(progress, Progress { consumed: 2, status: Status::MessageComplete });
    }

    #[test]
    fn write_header_on_bodyless_message() {
        let mut parser = BasicParser::request(Recorder::default());
        let progress = parser.write_header(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(progress.status, Status::MessageComplete);
    }

    #[test]
    fn exhausted_after_complete_or_failure() {
        let mut parser = BasicParser::request(Recorder::default());
        parser.write(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert!(matches!(parser.write(b"GET / HTTP/1.1\r\n\r\n"), Err(ParseError::Exhausted)));
        assert!(matches!(parser.write_eof(), Err(ParseError::Exhausted)));

        let mut parser = BasicParser::request(Recorder::default());
        assert!(matches!(parser.write(b"GET / HTTP/1.1\nHost: a\r\n"), Err(ParseError::InvalidStartLine { .. })));
        assert!(parser.is_failed());
        assert!(matches!(parser.write(b"\r\n"), Err(ParseError::Exhausted)));
    }

    #[test]
    fn header_limits() {
        let config = ParserConfig::default().with_max_header_bytes(32);
        let mut parser = BasicParser::request(Recorder::default()).with_config(config);
        let err = parser.write(b"GET / HTTP/1.1\r\nX-Long: aaaaaaaaaaaaaaaa").unwrap_err();
        assert!(matches!(err, ParseError::TooLargeHeader { max_size: 32, .. }));

        let config = ParserConfig::default().with_max_headers(1);
        let mut parser = BasicParser::request(Recorder::default()).with_config(config);
        let err = parser.write(b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::TooManyHeaders { max_num: 1 }));
    }

    #[test]
    fn trailer_limits_reset_per_section() {
        let config = ParserConfig::default().with_max_headers(1);
        let input = b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n0\r\nA: 1\r\n\r\n";
        let mut parser = BasicParser::request(Recorder::default()).with_config(config);
        assert_eq!(parser.write(input).unwrap().status, Status::MessageComplete);

        let input = b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n0\r\nA: 1\r\nB: 2\r\n\r\n";
        let mut parser = BasicParser::request(Recorder::default()).with_config(config);
        assert!(matches!(parser.write(input), Err(ParseError::TooManyHeaders { .. })));
    }

    #[test]
    fn body_limits() {
        let config = ParserConfig::default().with_max_body_bytes(4);

        let mut parser = BasicParser::request(Recorder::default()).with_config(config);
        let err = parser.write(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::TooLargeBody { current_size: 5, max_size: 4 }));

        let mut parser = BasicParser::request(Recorder::default()).with_config(config);
        let err = parser.write(b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\n2\r\n").unwrap_err();
        assert!(matches!(err, ParseError::TooLargeBody { current_size: 5, max_size: 4 }));

        let mut parser = BasicParser::response(Recorder::default()).with_config(config);
        parser.write(b"HTTP/1.1 200 OK\r\n\r\nabc").unwrap();
        assert!(matches!(parser.write(b"de"), Err(ParseError::TooLargeBody { current_size: 5, max_size: 4 })));
    }

    #[test]
    fn close_delimited_body_ends_at_eof() {
        let mut parser = BasicParser::response(Recorder::default());
        let progress = parser.write(b"HTTP/1.0 200 OK\r\n\r\nsome data").unwrap();
        assert_eq!(progress.status, Status::NeedMore);
        assert!(parser.need_eof());
        assert_eq!(parser.remain(), u64::MAX);

        assert_eq!(parser.write_eof().unwrap(), Status::MessageComplete);
        assert!(!parser.keep_alive());
        assert_eq!(parser.handler().events[parser.handler().events.len() - 3..], ["body some data", "body end", "message end"]);
    }

    #[test]
    fn eof_without_body_bytes() {
        let mut parser = BasicParser::response(Recorder::default());
        parser.write(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
        assert_eq!(parser.write_eof().unwrap(), Status::MessageComplete);
        assert_eq!(parser.handler().events[2..], ["body begin None", "body end", "message end"]);
    }

    #[test]
    fn eof_truncates_message() {
        let mut parser = BasicParser::request(Recorder::default());
        parser.write(b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc").unwrap();
        assert!(matches!(parser.write_eof(), Err(ParseError::PartialMessage)));
        assert!(parser.is_failed());
    }

    #[test]
    fn response_to_head_has_no_body() {
        let mut parser = BasicParser::response(Recorder::default());
        parser.set_request_method(Method::HEAD);
        let input = b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n";
        assert_eq!(parser.write(input).unwrap(), Progress { consumed: input.len(), status: Status::MessageComplete });
    }

    #[test]
    fn skip_body_ignores_framing() {
        let mut parser = BasicParser::request(Recorder::default());
        parser.skip_body(true);
        let input = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        assert_eq!(parser.write(input).unwrap(), Progress { consumed: input.len() - 5, status: Status::MessageComplete });
    }

    #[test]
    fn direct_body_writes() {
        let mut parser = BasicParser::request(Recorder::default());
        parser.write(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\n").unwrap();

        assert!(matches!(parser.commit_body(1), Err(ParseError::NoBodyRemaining)));

        let region = parser.prepare_body(3).unwrap();
        assert_eq!(region.len(), 3);
        region.copy_from_slice(b"hel");
        assert_eq!(parser.commit_body(3).unwrap(), Status::NeedMore);
        assert_eq!(parser.remain(), 2);

        let region = parser.prepare_body(100).unwrap();
        assert_eq!(region.len(), 2);
        region.copy_from_slice(b"lo");
        assert_eq!(parser.commit_body(2).unwrap(), Status::MessageComplete);

        assert_eq!(
            parser.handler().events[3..],
            ["body begin Some(5)", "commit hel", "commit lo", "body end", "message end"]
        );
    }

    #[test]
    fn direct_body_write_per_chunk() {
        let mut parser = BasicParser::request(Recorder::default());
        parser.write(b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n4\r\n").unwrap();
        assert_eq!(parser.remain(), 4);

        parser.prepare_body(8).unwrap().copy_from_slice(b"data");
        parser.commit_body(4).unwrap();
        assert_eq!(parser.remain(), 0);
        assert!(matches!(parser.prepare_body(8), Err(ParseError::NoBodyRemaining)));

        assert_eq!(parser.write(b"\r\n0\r\n\r\n").unwrap().status, Status::MessageComplete);
    }

    #[test]
    fn direct_body_unsupported_by_default() {
        struct Plain;
        impl Handler for Plain {}

        let mut parser = BasicParser::request(Plain);
        parser.write(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\n").unwrap();
        assert!(matches!(parser.prepare_body(5), Err(ParseError::UnsupportedDirectBody)));
    }

    #[test]
    fn chunk_errors() {
        let cases: [&[u8]; 4] = [
            b"5\r\nhelloXX",
            b"zz\r\n",
            b"5\nhello\r\n",
            b"fffffffffffffffff\r\n",
        ];
        for case in cases {
            let mut parser = BasicParser::request(Recorder::default());
            parser.write(b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n").unwrap();
            let err = parser.write(case).unwrap_err();
            assert!(err.is_syntax(), "{case:?} gave {err}");
        }
    }

    #[test]
    fn longest_chunk_line_split_before_lf() {
        let mut input = b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
        let header_len = input.len();
        let mut line = b"1;".to_vec();
        line.resize(MAX_CHUNK_LINE_BYTES, b'x');
        input.extend_from_slice(&line);
        input.extend_from_slice(b"\r\na\r\n0\r\n\r\n");

        let mut whole = BasicParser::request(Recorder::default());
        assert_eq!(whole.write(&input).unwrap().status, Status::MessageComplete);

        let mut split = BasicParser::request(Recorder::default());
        let progress = split.write(&input[..header_len + MAX_CHUNK_LINE_BYTES + 1]).unwrap();
        assert_eq!(progress, Progress { consumed: header_len, status: Status::NeedMore });
        assert_eq!(split.write(&input[header_len..]).unwrap().status, Status::MessageComplete);
        assert_eq!(whole.handler().events, split.handler().events);

        let mut parser = BasicParser::request(Recorder::default());
        parser.write(&input[..header_len]).unwrap();
        line.push(b'x');
        assert!(matches!(parser.write(&line), Err(ParseError::InvalidChunk { .. })));
    }

    #[test]
    fn empty_commit_between_chunks_is_rejected() {
        let mut parser = BasicParser::request(Recorder::default());
        parser.write(b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc").unwrap();
        assert_eq!(parser.remain(), 0);

        assert!(matches!(parser.commit_body(0), Err(ParseError::NoBodyRemaining)));
        assert!(!parser.is_failed());
        assert_eq!(parser.write(b"\r\n0\r\n\r\n").unwrap().status, Status::MessageComplete);
    }

    #[test]
    fn handler_error_aborts() {
        struct Reject;
        impl Handler for Reject {
            fn on_field(&mut self, name: &str, _value: &str) -> Result<(), ParseError> {
                if name == "X-Bad" {
                    return Err(ParseError::custom("rejected field"));
                }
                Ok(())
            }
        }

        let mut parser = BasicParser::request(Reject);
        let err = parser.write(b"GET / HTTP/1.1\r\nX-Bad: 1\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::Custom { .. }));
        assert!(parser.is_failed());
    }
}
