//! Incremental HTTP/1.x parsing.
//!
//! The codec works in two layers:
//!
//! - [`BasicParser`]: the wire format state machine. It consumes bytes without buffering them
//!   and reports start-line, fields, chunk headers and body data to a [`Handler`].
//! - [`MessageParser`]: a [`Handler`] that assembles a [`Message`](crate::protocol::Message),
//!   storing the body through a [`BodyReader`](crate::protocol::body::BodyReader).
//!
//! [`MessageDecoder`] plugs the second layer into `tokio_util`'s [`Decoder`](tokio_util::codec::Decoder)
//! for use with `FramedRead`.
//!
//! Both parsers follow the same input discipline: a write consumes the longest prefix of its
//! input that forms complete tokens, reports the consumed length, and expects the caller to
//! present the remaining bytes again together with newly arrived ones. Splitting the input at
//! any point therefore yields the same events and the same message.

mod basic_parser;
mod framing;
mod handler;
mod message_decoder;
mod message_parser;
mod scan;
mod start_line;

pub use basic_parser::{BasicParser, Progress, Status};
pub use framing::Framing;
pub use handler::Handler;
pub use message_decoder::{MessageDecoder, RequestDecoder, ResponseDecoder};
pub use message_parser::{MessageParser, RequestParser, ResponseParser};
