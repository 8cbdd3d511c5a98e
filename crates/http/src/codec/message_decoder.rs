//! [`Decoder`] adapter that yields complete, buffered messages from a byte stream.
//!
//! Each message is parsed by a fresh [`MessageParser`] backed by a [`BufferedBody`]. The
//! decoder advances the source buffer by exactly what the parser consumed, so pipelined
//! messages come out one per `decode` call.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_http_parser::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n"[..]);
//!
//! let first = decoder.decode(&mut buffer).unwrap().unwrap();
//! let second = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(first.target(), "/a");
//! assert_eq!(second.target(), "/b");
//! assert!(buffer.is_empty());
//! ```

use std::collections::VecDeque;

use bytes::{Buf, BytesMut};
use http::Method;
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::{MessageParser, Status};
use crate::protocol::body::BufferedBody;
use crate::protocol::{Head, Message, ParseError, ParserConfig, RequestHead, ResponseHead};

/// Decodes a stream of HTTP/1.x messages of one kind.
///
/// After a message that switches protocols (a CONNECT tunnel or a `101` upgrade) the decoder
/// yields nothing more; the remaining bytes belong to the new protocol and are left in the
/// buffer.
///
/// A response decoder cannot tell from the wire alone that a response answers `HEAD` or
/// `CONNECT`. Queue the method of every request sent with
/// [`push_request_method`](Self::push_request_method); each new response takes the oldest one.
#[derive(Debug)]
pub struct MessageDecoder<H> {
    config: ParserConfig,
    parser: Option<MessageParser<H, BufferedBody>>,
    request_methods: VecDeque<Method>,
    upgraded: bool,
}

pub type RequestDecoder = MessageDecoder<RequestHead>;
pub type ResponseDecoder = MessageDecoder<ResponseHead>;

impl<H: Head> MessageDecoder<H> {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config, parser: None, request_methods: VecDeque::new(), upgraded: false }
    }

    /// Queues the method of a request whose response has not been decoded yet.
    ///
    /// Only meaningful for response decoders. Responses decoded while the queue is empty are
    /// framed without knowing their request method.
    pub fn push_request_method(&mut self, method: Method) {
        self.request_methods.push_back(method);
    }

    /// Whether a message switched the connection to another protocol.
    pub fn is_upgraded(&self) -> bool {
        self.upgraded
    }

    fn finish(&mut self, parser: MessageParser<H, BufferedBody>) -> Message<H, BufferedBody> {
        self.upgraded = parser.upgrade();
        if self.upgraded {
            debug!("connection upgraded, decoder stops");
        }
        parser.release()
    }
}

impl<H: Head> Default for MessageDecoder<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Head> Decoder for MessageDecoder<H> {
    type Item = Message<H, BufferedBody>;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.upgraded || (src.is_empty() && self.parser.is_none()) {
            return Ok(None);
        }

        let config = self.config;
        let methods = &mut self.request_methods;
        let parser = self.parser.get_or_insert_with(|| {
            let mut parser = MessageParser::with_config(config);
            if let Some(method) = methods.pop_front() {
                parser.set_request_method(method);
            }
            parser
        });

        let progress = match parser.write(src) {
            Ok(progress) => progress,
            Err(e) => {
                self.parser = None;
                return Err(e);
            }
        };
        src.advance(progress.consumed);
        trace!(consumed = progress.consumed, status = ?progress.status, "decoded bytes");

        match progress.status {
            Status::MessageComplete => match self.parser.take() {
                Some(parser) => Ok(Some(self.finish(parser))),
                None => Ok(None),
            },
            Status::NeedMore | Status::HeaderComplete => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(message) = self.decode(src)? {
            return Ok(Some(message));
        }

        match self.parser.take() {
            Some(mut parser) => {
                parser.write_eof()?;
                Ok(Some(self.finish(parser)))
            }
            None => Ok(None),
        }
    }
}
