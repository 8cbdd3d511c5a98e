//! An incremental, non-blocking HTTP/1.x message parser
//!
//! This crate parses HTTP/1.0 and HTTP/1.1 requests and responses from byte buffers that arrive
//! in arbitrary pieces. It performs no I/O itself: callers feed bytes, the parser consumes what
//! it can and reports how much, and the caller keeps the rest for the next call.
//!
//! # Features
//!
//! - Request and response parsing with the same state machine
//! - Content-Length, chunked and close-delimited bodies, chunk extensions and trailers
//! - Framing decisions that reject ambiguous messages (conflicting Content-Length,
//!   Transfer-Encoding not ending in chunked)
//! - Keep-alive and upgrade detection, including responses to HEAD and CONNECT
//! - Configurable limits on header size, field count and body size
//! - Pluggable body storage: in memory, discarded, or streamed to any [`std::io::Write`]
//! - A `tokio_util` [`Decoder`](tokio_util::codec::Decoder) for use with `FramedRead`
//!
//! # Example
//!
//! ```
//! use micro_http_parser::codec::{ResponseParser, Status};
//! use micro_http_parser::protocol::body::BufferedBody;
//!
//! let wire: &[u8] = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n";
//!
//! let mut parser = ResponseParser::<BufferedBody>::new();
//! let mut buffer = Vec::new();
//! for piece in wire.chunks(7) {
//!     buffer.extend_from_slice(piece);
//!     let progress = parser.write(&buffer).unwrap();
//!     buffer.drain(..progress.consumed);
//!     if progress.status == Status::MessageComplete {
//!         break;
//!     }
//! }
//!
//! assert!(parser.is_done());
//! assert!(parser.keep_alive());
//! let response = parser.release();
//! assert_eq!(response.status(), http::StatusCode::OK);
//! assert_eq!(response.body().as_bytes(), b"hello");
//! ```
//!
//! # Architecture
//!
//! - [`codec`]: the [`BasicParser`](codec::BasicParser) state machine, the
//!   [`Handler`](codec::Handler) callback contract, the [`MessageParser`](codec::MessageParser)
//!   assembler and the [`MessageDecoder`](codec::MessageDecoder) adapter
//! - [`protocol`]: messages, fields, versions, body readers, configuration and errors
//!
//! # Error Handling
//!
//! Every failure is a [`protocol::ParseError`]. Errors are fatal to the parser that raised them:
//! any later call returns [`ParseError::Exhausted`](protocol::ParseError::Exhausted).
//! [`ParseError::kind`](protocol::ParseError::kind) classifies errors as syntax, framing, limit,
//! consumer or misuse.
//!
//! # Logging
//!
//! The parser emits `tracing` events: `debug` for framing decisions, completed messages and
//! failures, `trace` for individual tokens. Nothing is logged above `debug`.

pub mod codec;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
