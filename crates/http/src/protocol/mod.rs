//! Message values and the contracts around them.
//!
//! This module holds everything the parser produces or fills in, independent of how bytes are
//! scanned:
//!
//! - **Messages** ([`message`]): [`Message`] with a [`RequestHead`] or [`ResponseHead`]
//! - **Fields** ([`fields`]): [`Fields`], an ordered, duplicate preserving field collection
//! - **Versions**: [`HttpVersion`], the `HTTP/<major>.<minor>` pair
//! - **Body storage** ([`body`]): the [`BodyReader`](body::BodyReader) contract and its
//!   in-memory, discarding and streaming implementations
//! - **Configuration**: [`ParserConfig`] resource limits
//! - **Errors**: [`ParseError`] and its [`ErrorKind`] classification

mod message;
pub use message::Head;
pub use message::Message;
pub use message::Request;
pub use message::RequestHead;
pub use message::Response;
pub use message::ResponseHead;

mod fields;
pub use fields::Field;
pub use fields::Fields;

mod version;
pub use version::HttpVersion;

mod config;
pub use config::ParserConfig;
pub use config::DEFAULT_MAX_HEADERS;
pub use config::DEFAULT_MAX_HEADER_BYTES;

mod error;
pub use error::ErrorKind;
pub use error::ParseError;

pub mod body;
