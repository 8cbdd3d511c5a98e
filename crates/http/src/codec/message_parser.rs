//! Assembles parsed messages on top of [`BasicParser`].
//!
//! [`MessageParser`] fills a [`Message`] from parser events: the head from the start-line, the
//! [`Fields`](crate::protocol::Fields) from header and trailer fields, and the body through a
//! pluggable [`BodyReader`].
//!
//! # Example
//!
//! ```
//! use micro_http_parser::codec::{RequestParser, Status};
//! use micro_http_parser::protocol::body::BufferedBody;
//!
//! let mut parser = RequestParser::<BufferedBody>::new();
//! let input = b"POST /items HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
//!
//! let progress = parser.write(input).unwrap();
//! assert_eq!(progress.status, Status::MessageComplete);
//!
//! let request = parser.release();
//! assert_eq!(request.target(), "/items");
//! assert_eq!(request.body().as_bytes(), b"hello");
//! ```

use bytes::Buf;
use http::Method;

use crate::codec::{BasicParser, Framing, Handler, Progress, Status};
use crate::ensure;
use crate::protocol::body::{self, BodyReader};
use crate::protocol::{Head, HttpVersion, Message, ParseError, ParserConfig, RequestHead, ResponseHead};

/// Routes parser events into a message under construction.
#[derive(Debug)]
struct Assembler<H, B> {
    message: Message<H, B>,
}

impl<H: Head, B: BodyReader> Handler for Assembler<H, B> {
    fn on_request(&mut self, method: &str, target: &str, version: HttpVersion) -> Result<(), ParseError> {
        self.message.set_head(H::from_request_line(method, target, version)?);
        Ok(())
    }

    fn on_response(&mut self, status: u16, reason: &str, version: HttpVersion) -> Result<(), ParseError> {
        self.message.set_head(H::from_status_line(status, reason, version)?);
        Ok(())
    }

    fn on_field(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        self.message.fields_mut().insert(name, value);
        Ok(())
    }

    fn on_body_begin(&mut self, content_length: Option<u64>) -> Result<(), ParseError> {
        self.message.body_mut().init(content_length)
    }

    fn on_body(&mut self, data: &[u8]) -> Result<(), ParseError> {
        body::write_all(self.message.body_mut(), data)
    }

    fn on_body_prepare(&mut self, size: usize) -> Result<&mut [u8], ParseError> {
        self.message.body_mut().prepare(size)
    }

    fn on_body_commit(&mut self, size: usize) -> Result<(), ParseError> {
        self.message.body_mut().commit(size)
    }

    fn on_body_end(&mut self) -> Result<(), ParseError> {
        self.message.body_mut().finish()
    }
}

/// Parses one message into a [`Message`], storing its body with a [`BodyReader`].
///
/// The completed message stays available through [`get`](Self::get) and is handed over with
/// [`release`](Self::release).
#[derive(Debug)]
pub struct MessageParser<H, B> {
    inner: BasicParser<Assembler<H, B>>,
}

pub type RequestParser<B> = MessageParser<RequestHead, B>;
pub type ResponseParser<B> = MessageParser<ResponseHead, B>;

impl<H: Head, B: BodyReader + Default> MessageParser<H, B> {
    pub fn new() -> Self {
        Self::with_body(B::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self::with_body_and_config(B::default(), config)
    }
}

impl<H: Head, B: BodyReader + Default> Default for MessageParser<H, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Head, B: BodyReader> MessageParser<H, B> {
    pub fn with_body(body: B) -> Self {
        Self::with_body_and_config(body, ParserConfig::default())
    }

    pub fn with_body_and_config(body: B, config: ParserConfig) -> Self {
        let assembler = Assembler { message: Message::new(H::default(), Default::default(), body) };
        Self { inner: BasicParser::new(assembler, H::IS_REQUEST).with_config(config) }
    }

    /// See [`BasicParser::write`].
    pub fn write(&mut self, input: &[u8]) -> Result<Progress, ParseError> {
        self.inner.write(input)
    }

    /// See [`BasicParser::write_header`].
    pub fn write_header(&mut self, input: &[u8]) -> Result<Progress, ParseError> {
        self.inner.write_header(input)
    }

    /// See [`BasicParser::write_eof`].
    pub fn write_eof(&mut self) -> Result<Status, ParseError> {
        self.inner.write_eof()
    }

    /// A body region of up to `limit` bytes to fill directly, owned by the body reader.
    pub fn prepare(&mut self, limit: usize) -> Result<&mut [u8], ParseError> {
        self.inner.prepare_body(limit)
    }

    /// Commits `size` bytes of the last prepared region.
    pub fn commit(&mut self, size: usize) -> Result<Status, ParseError> {
        self.inner.commit_body(size)
    }

    /// Moves as many body bytes as the parser currently accepts out of `src`.
    ///
    /// Stops at the end of the fixed-length body or the current chunk, whichever applies.
    /// Returns the number of bytes moved, 0 when no body bytes are eligible.
    pub fn copy<T: Buf>(&mut self, src: &mut T) -> Result<usize, ParseError> {
        let mut copied = 0;
        loop {
            let eligible = usize::try_from(self.inner.remain()).map_or(src.remaining(), |remain| remain.min(src.remaining()));
            if eligible == 0 {
                return Ok(copied);
            }

            let region = self.inner.prepare_body(eligible)?;
            let len = region.len();
            ensure!(len > 0, ParseError::NoBodyRemaining);
            src.copy_to_slice(region);
            self.inner.commit_body(len)?;
            copied += len;
        }
    }

    /// Replaces the body reader. Only allowed before the body begins, typically right after
    /// [`write_header`](Self::write_header) reported the header complete.
    pub fn with_body_reader<B2: BodyReader>(self, body: B2) -> Result<MessageParser<H, B2>, ParseError> {
        ensure!(self.inner.before_body(), ParseError::BodyAlreadyStarted);
        let inner = self.inner.map_handler(|assembler| Assembler { message: assembler.message.map_body(body).0 });
        Ok(MessageParser { inner })
    }

    /// The message as parsed so far.
    pub fn get(&self) -> &Message<H, B> {
        &self.inner.handler().message
    }

    /// Hands over the message. Check [`is_done`](Self::is_done) first; a message released
    /// early is incomplete.
    pub fn release(self) -> Message<H, B> {
        self.inner.into_handler().message
    }

    pub fn skip_body(&mut self, skip: bool) {
        self.inner.skip_body(skip);
    }

    pub fn set_request_method(&mut self, method: Method) {
        self.inner.set_request_method(method);
    }

    pub fn is_header_done(&self) -> bool {
        self.inner.is_header_done()
    }

    pub fn is_done(&self) -> bool {
        self.inner.is_done()
    }

    pub fn keep_alive(&self) -> bool {
        self.inner.keep_alive()
    }

    pub fn upgrade(&self) -> bool {
        self.inner.upgrade()
    }

    pub fn need_eof(&self) -> bool {
        self.inner.need_eof()
    }

    pub fn content_length(&self) -> Option<u64> {
        self.inner.content_length()
    }

    pub fn is_chunked(&self) -> bool {
        self.inner.is_chunked()
    }

    pub fn framing(&self) -> Option<Framing> {
        self.inner.framing()
    }

    pub fn remain(&self) -> u64 {
        self.inner.remain()
    }

    pub fn version(&self) -> HttpVersion {
        self.inner.version()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;
    use indoc::indoc;

    use super::*;
    use crate::protocol::body::{BufferedBody, DiscardBody, StreamingBody};

    fn crlf(text: &str) -> Vec<u8> {
        text.replace('\n', "\r\n").into_bytes()
    }

    #[test]
    fn assembles_request() {
        let input = crlf(indoc! {"
            POST /form?x=1 HTTP/1.1
            Host: example.com
            Accept: text/plain
            Accept: text/html
            Content-Length: 11

            hello world"});

        let mut parser = RequestParser::<BufferedBody>::new();
        assert_eq!(parser.write(&input).unwrap().status, Status::MessageComplete);

        let request = parser.release();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.target(), "/form?x=1");
        assert_eq!(request.version(), HttpVersion::HTTP_11);
        assert_eq!(request.fields().get("host"), Some("example.com"));
        assert_eq!(request.fields().get_all("accept").collect::<Vec<_>>(), ["text/plain", "text/html"]);
        assert_eq!(request.body().as_bytes(), b"hello world");
    }

    #[test]
    fn trailers_are_appended_to_fields() {
        let input = crlf(indoc! {"
            HTTP/1.1 200 OK
            Transfer-Encoding: chunked
            Trailer: Checksum

            3
            abc
            0
            Checksum: 900150983cd24fb0

            "});

        let mut parser = ResponseParser::<BufferedBody>::new();
        assert_eq!(parser.write(&input).unwrap().status, Status::MessageComplete);

        let response = parser.release();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.fields().len(), 3);
        assert_eq!(response.fields().get("checksum"), Some("900150983cd24fb0"));
        assert_eq!(response.body().as_bytes(), b"abc");
    }

    #[test]
    fn swap_body_reader_after_header() {
        let input = b"PUT /blob HTTP/1.1\r\nContent-Length: 4\r\n\r\nblob";
        let mut parser = RequestParser::<DiscardBody>::new();

        let progress = parser.write_header(input).unwrap();
        assert_eq!(progress.status, Status::HeaderComplete);
        assert_eq!(parser.content_length(), Some(4));

        let mut parser = parser.with_body_reader(StreamingBody::new(Vec::new())).unwrap();
        let rest = &input[progress.consumed..];
        assert_eq!(parser.write(rest).unwrap().consumed, 4);
        assert!(parser.is_done());

        let request = parser.release();
        assert_eq!(request.target(), "/blob");
        assert_eq!(request.body().get_ref(), b"blob");
    }

    #[test]
    fn swap_body_reader_too_late() {
        let mut parser = RequestParser::<DiscardBody>::new();
        parser.write(b"PUT / HTTP/1.1\r\nContent-Length: 4\r\n\r\nbl").unwrap();
        assert!(matches!(parser.with_body_reader(BufferedBody::new()), Err(ParseError::BodyAlreadyStarted)));
    }

    #[test]
    fn copy_stops_at_body_end() {
        let mut parser = RequestParser::<BufferedBody>::new();
        parser.write_header(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\n").unwrap();

        let mut src = Bytes::from_static(b"helloGET / HTTP/1.1\r\n");
        assert_eq!(parser.copy(&mut src).unwrap(), 5);
        assert!(parser.is_done());
        assert_eq!(&src[..], b"GET / HTTP/1.1\r\n");
        assert_eq!(parser.get().body().as_bytes(), b"hello");
    }

    #[test]
    fn copy_follows_chunks() {
        let mut parser = RequestParser::<BufferedBody>::new();
        parser.write(b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n3\r\n").unwrap();

        let mut src = Bytes::from_static(b"abcdef");
        assert_eq!(parser.copy(&mut src).unwrap(), 3);
        assert_eq!(parser.copy(&mut src).unwrap(), 0);
        assert_eq!(&src[..], b"def");

        assert_eq!(parser.write(b"\r\n0\r\n\r\n").unwrap().status, Status::MessageComplete);
        assert_eq!(parser.release().body().as_bytes(), b"abc");
    }

    #[test]
    fn prepare_commit() {
        let mut parser = ResponseParser::<BufferedBody>::new();
        parser.write(b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\n").unwrap();

        parser.prepare(3).unwrap().copy_from_slice(b"xyz");
        assert_eq!(parser.commit(3).unwrap(), Status::MessageComplete);
        assert_eq!(parser.get().body().as_bytes(), b"xyz");
    }

    #[test]
    fn body_reader_limit_aborts() {
        let mut parser = RequestParser::with_body(BufferedBody::with_limit(4));
        let err = parser.write(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello").unwrap_err();
        assert!(err.is_limit());
    }

    #[test]
    fn wrong_start_line_kind() {
        let mut parser = RequestParser::<DiscardBody>::new();
        // a status line does not parse as a request line
        assert!(parser.write(b"HTTP/1.1 200 OK\r\n\r\n").unwrap_err().is_syntax());
    }
}
