use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Broad classification of a [`ParseError`].
///
/// Callers use this to pick a reaction without matching every variant: limit errors map to
/// size specific statuses (431, 413), while syntax and framing errors always end the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed start-line, field, chunk line or number.
    Syntax,
    /// The body length cannot be determined unambiguously.
    Framing,
    /// A caller configured maximum was exceeded.
    Limit,
    /// A body reader or callback handler failed.
    Consumer,
    /// The parser was driven in a way its contract forbids.
    Misuse,
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid start line: {reason}")]
    InvalidStartLine { reason: String },

    #[error("invalid http version")]
    InvalidVersion,

    #[error("invalid http method")]
    InvalidMethod,

    #[error("invalid request target")]
    InvalidTarget,

    #[error("invalid status code")]
    InvalidStatus,

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("invalid chunk: {reason}")]
    InvalidChunk { reason: String },

    #[error("conflicting content-length values {first} and {second}")]
    ConflictingContentLength { first: u64, second: u64 },

    #[error("ambiguous message framing: {reason}")]
    AmbiguousFraming { reason: String },

    #[error("stream ended before the message was complete")]
    PartialMessage,

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("header number exceed the limit {max_num}")]
    TooManyHeaders { max_num: usize },

    #[error("body size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeBody { current_size: u64, max_size: u64 },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("handler error: {source}")]
    Custom { source: Box<dyn StdError + Send + Sync> },

    #[error("parser already finished or failed")]
    Exhausted,

    #[error("previously prepared body region was not committed")]
    BodyRegionPending,

    #[error("no body bytes remain to be prepared or committed")]
    NoBodyRemaining,

    #[error("handler does not support direct body writes")]
    UnsupportedDirectBody,

    #[error("body reader can only be replaced before the body begins")]
    BodyAlreadyStarted,
}

impl ParseError {
    pub fn invalid_start_line<S: ToString>(str: S) -> Self {
        Self::InvalidStartLine { reason: str.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn invalid_chunk<S: ToString>(str: S) -> Self {
        Self::InvalidChunk { reason: str.to_string() }
    }

    pub fn ambiguous_framing<S: ToString>(str: S) -> Self {
        Self::AmbiguousFraming { reason: str.to_string() }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn too_many_headers(max_num: usize) -> Self {
        Self::TooManyHeaders { max_num }
    }

    pub fn too_large_body(current_size: u64, max_size: u64) -> Self {
        Self::TooLargeBody { current_size, max_size }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Wraps an arbitrary error raised from inside a [`Handler`](crate::codec::Handler) callback.
    pub fn custom<E: Into<Box<dyn StdError + Send + Sync>>>(e: E) -> Self {
        Self::Custom { source: e.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStartLine { .. }
            | Self::InvalidVersion
            | Self::InvalidMethod
            | Self::InvalidTarget
            | Self::InvalidStatus
            | Self::InvalidHeader { .. }
            | Self::InvalidContentLength { .. }
            | Self::InvalidChunk { .. } => ErrorKind::Syntax,
            Self::ConflictingContentLength { .. } | Self::AmbiguousFraming { .. } | Self::PartialMessage => {
                ErrorKind::Framing
            }
            Self::TooLargeHeader { .. } | Self::TooManyHeaders { .. } | Self::TooLargeBody { .. } => ErrorKind::Limit,
            Self::Io { .. } | Self::Custom { .. } => ErrorKind::Consumer,
            Self::Exhausted
            | Self::BodyRegionPending
            | Self::NoBodyRemaining
            | Self::UnsupportedDirectBody
            | Self::BodyAlreadyStarted => ErrorKind::Misuse,
        }
    }

    #[inline]
    pub fn is_limit(&self) -> bool {
        self.kind() == ErrorKind::Limit
    }

    #[inline]
    pub fn is_framing(&self) -> bool {
        self.kind() == ErrorKind::Framing
    }

    #[inline]
    pub fn is_syntax(&self) -> bool {
        self.kind() == ErrorKind::Syntax
    }
}
