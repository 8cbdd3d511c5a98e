use std::fmt;

use http::{Method, StatusCode, Version};

use crate::protocol::{Fields, HttpVersion, ParseError};

/// The start-line half of a message: what distinguishes a request from a response.
///
/// A [`MessageParser`](crate::codec::MessageParser) parses requests or responses depending on
/// [`Head::IS_REQUEST`] of the head type it is instantiated with.
pub trait Head: Default + fmt::Debug {
    const IS_REQUEST: bool;

    fn version(&self) -> HttpVersion;

    fn from_request_line(method: &str, target: &str, version: HttpVersion) -> Result<Self, ParseError>;

    fn from_status_line(status: u16, reason: &str, version: HttpVersion) -> Result<Self, ParseError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    method: Method,
    target: String,
    version: HttpVersion,
}

impl RequestHead {
    pub fn new(method: Method, target: impl Into<String>, version: HttpVersion) -> Self {
        Self { method, target: target.into(), version }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request target exactly as received, without any decoding.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for RequestHead {
    fn default() -> Self {
        Self { method: Method::GET, target: String::new(), version: HttpVersion::default() }
    }
}

impl Head for RequestHead {
    const IS_REQUEST: bool = true;

    fn version(&self) -> HttpVersion {
        self.version
    }

    fn from_request_line(method: &str, target: &str, version: HttpVersion) -> Result<Self, ParseError> {
        let method = Method::from_bytes(method.as_bytes()).map_err(|_| ParseError::InvalidMethod)?;
        Ok(Self::new(method, target, version))
    }

    fn from_status_line(_status: u16, _reason: &str, _version: HttpVersion) -> Result<Self, ParseError> {
        Err(ParseError::invalid_start_line("expected a request line"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    status: StatusCode,
    reason: String,
    version: HttpVersion,
}

impl ResponseHead {
    pub fn new(status: StatusCode, reason: impl Into<String>, version: HttpVersion) -> Self {
        Self { status, reason: reason.into(), version }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The reason phrase exactly as received. May be empty.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Default for ResponseHead {
    fn default() -> Self {
        Self { status: StatusCode::OK, reason: String::new(), version: HttpVersion::default() }
    }
}

impl Head for ResponseHead {
    const IS_REQUEST: bool = false;

    fn version(&self) -> HttpVersion {
        self.version
    }

    fn from_request_line(_method: &str, _target: &str, _version: HttpVersion) -> Result<Self, ParseError> {
        Err(ParseError::invalid_start_line("expected a status line"))
    }

    fn from_status_line(status: u16, reason: &str, version: HttpVersion) -> Result<Self, ParseError> {
        let status = StatusCode::from_u16(status).map_err(|_| ParseError::InvalidStatus)?;
        Ok(Self::new(status, reason, version))
    }
}

/// A parsed HTTP/1.x message: start-line, fields and body.
///
/// Trailer fields of chunked messages are appended to [`fields`](Message::fields) after the
/// header fields, in arrival order.
#[derive(Debug, Default)]
pub struct Message<H, B> {
    head: H,
    fields: Fields,
    body: B,
}

pub type Request<B> = Message<RequestHead, B>;
pub type Response<B> = Message<ResponseHead, B>;

impl<H, B> Message<H, B> {
    pub fn new(head: H, fields: Fields, body: B) -> Self {
        Self { head, fields, body }
    }

    pub fn head(&self) -> &H {
        &self.head
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn into_parts(self) -> (H, Fields, B) {
        (self.head, self.fields, self.body)
    }

    pub(crate) fn set_head(&mut self, head: H) {
        self.head = head;
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    pub(crate) fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    /// Replaces the body storage, keeping head and fields.
    pub(crate) fn map_body<B2>(self, body: B2) -> (Message<H, B2>, B) {
        (Message { head: self.head, fields: self.fields, body }, self.body)
    }
}

impl<H: Head, B> Message<H, B> {
    pub fn version(&self) -> HttpVersion {
        self.head.version()
    }
}

impl<B> Message<RequestHead, B> {
    pub fn method(&self) -> &Method {
        self.head.method()
    }

    pub fn target(&self) -> &str {
        self.head.target()
    }

    /// Converts into an [`http::Request`]. Versions `http` cannot represent become HTTP/1.1.
    pub fn into_http(self) -> Result<http::Request<B>, http::Error> {
        let headers = self.fields.to_header_map()?;
        let mut request = http::Request::builder()
            .method(self.head.method)
            .uri(self.head.target)
            .version(Version::try_from(self.head.version).unwrap_or(Version::HTTP_11))
            .body(self.body)?;
        *request.headers_mut() = headers;
        Ok(request)
    }
}

impl<B> Message<ResponseHead, B> {
    pub fn status(&self) -> StatusCode {
        self.head.status()
    }

    pub fn reason(&self) -> &str {
        self.head.reason()
    }

    /// Converts into an [`http::Response`]. Versions `http` cannot represent become HTTP/1.1.
    pub fn into_http(self) -> Result<http::Response<B>, http::Error> {
        let headers = self.fields.to_header_map()?;
        let mut response = http::Response::builder()
            .status(self.head.status)
            .version(Version::try_from(self.head.version).unwrap_or(Version::HTTP_11))
            .body(self.body)?;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
