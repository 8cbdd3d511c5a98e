/// Default maximum number of header fields, also applied to trailer fields
pub const DEFAULT_MAX_HEADERS: usize = 64;

/// Default maximum size in bytes of the header section, also applied to the trailer section
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8 * 1024;

/// Resource limits applied while parsing a single message.
///
/// Exceeding any of them fails the parse with an error of kind
/// [`ErrorKind::Limit`](crate::protocol::ErrorKind::Limit).
///
/// ```
/// use micro_http_parser::protocol::ParserConfig;
///
/// let config = ParserConfig::default().with_max_headers(16).with_max_body_bytes(1024 * 1024);
/// assert_eq!(config.max_headers(), 16);
/// assert_eq!(config.max_header_bytes(), 8 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    max_header_bytes: usize,
    max_headers: usize,
    max_body_bytes: Option<u64>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_header_bytes: DEFAULT_MAX_HEADER_BYTES, max_headers: DEFAULT_MAX_HEADERS, max_body_bytes: None }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes allowed for the start-line, header fields and the terminating blank line.
    pub fn with_max_header_bytes(mut self, max: usize) -> Self {
        self.max_header_bytes = max;
        self
    }

    pub fn with_max_headers(mut self, max: usize) -> Self {
        self.max_headers = max;
        self
    }

    /// Bytes allowed for the body. Checked against a declared content length up front, and
    /// against the running total for chunked and close-delimited bodies.
    pub fn with_max_body_bytes(mut self, max: u64) -> Self {
        self.max_body_bytes = Some(max);
        self
    }

    pub fn max_header_bytes(&self) -> usize {
        self.max_header_bytes
    }

    pub fn max_headers(&self) -> usize {
        self.max_headers
    }

    pub fn max_body_bytes(&self) -> Option<u64> {
        self.max_body_bytes
    }
}
