use crate::protocol::{HttpVersion, ParseError};

/// Receives the structural events of one message from a [`BasicParser`](crate::codec::BasicParser).
///
/// Callbacks arrive in wire order:
///
/// ```text
/// (on_request | on_response)
/// on_field*
/// on_header_end
/// [ on_body_begin
///   (on_body* | (on_chunk on_body*)+)
///   on_body_end
///   on_trailer* ]
/// on_message_end
/// ```
///
/// `on_body_begin` is delayed until body bytes are first written or a direct region is prepared,
/// so the handler can still be swapped after the header section. Messages without a body go
/// straight from `on_header_end` to `on_message_end`.
///
/// Every callback may fail. The error aborts the parse and is returned unchanged from the
/// parser call that triggered it. All callbacks have no-op defaults, except the direct body
/// pair which fails with [`ParseError::UnsupportedDirectBody`].
pub trait Handler {
    fn on_request(&mut self, method: &str, target: &str, version: HttpVersion) -> Result<(), ParseError> {
        let _ = (method, target, version);
        Ok(())
    }

    fn on_response(&mut self, status: u16, reason: &str, version: HttpVersion) -> Result<(), ParseError> {
        let _ = (status, reason, version);
        Ok(())
    }

    /// One header field, value stripped of surrounding whitespace.
    fn on_field(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        let _ = (name, value);
        Ok(())
    }

    fn on_header_end(&mut self) -> Result<(), ParseError> {
        Ok(())
    }

    /// `content_length` is the declared length, `None` for chunked and close-delimited bodies.
    fn on_body_begin(&mut self, content_length: Option<u64>) -> Result<(), ParseError> {
        let _ = content_length;
        Ok(())
    }

    /// A chunk header. `extension` is the raw text from the first `;`, empty when absent.
    /// The terminating zero-size chunk is reported too.
    fn on_chunk(&mut self, size: u64, extension: &str) -> Result<(), ParseError> {
        let _ = (size, extension);
        Ok(())
    }

    fn on_body(&mut self, data: &[u8]) -> Result<(), ParseError> {
        let _ = data;
        Ok(())
    }

    /// Hands out a region of at most `size` bytes that the caller fills directly.
    fn on_body_prepare(&mut self, size: usize) -> Result<&mut [u8], ParseError> {
        let _ = size;
        Err(ParseError::UnsupportedDirectBody)
    }

    /// Finalizes `size` bytes of the last prepared region.
    fn on_body_commit(&mut self, size: usize) -> Result<(), ParseError> {
        let _ = size;
        Err(ParseError::UnsupportedDirectBody)
    }

    fn on_body_end(&mut self) -> Result<(), ParseError> {
        Ok(())
    }

    fn on_trailer(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        self.on_field(name, value)
    }

    fn on_message_end(&mut self) -> Result<(), ParseError> {
        Ok(())
    }
}

impl<T: Handler + ?Sized> Handler for &mut T {
    fn on_request(&mut self, method: &str, target: &str, version: HttpVersion) -> Result<(), ParseError> {
        (**self).on_request(method, target, version)
    }

    fn on_response(&mut self, status: u16, reason: &str, version: HttpVersion) -> Result<(), ParseError> {
        (**self).on_response(status, reason, version)
    }

    fn on_field(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        (**self).on_field(name, value)
    }

    fn on_header_end(&mut self) -> Result<(), ParseError> {
        (**self).on_header_end()
    }

    fn on_body_begin(&mut self, content_length: Option<u64>) -> Result<(), ParseError> {
        (**self).on_body_begin(content_length)
    }

    fn on_chunk(&mut self, size: u64, extension: &str) -> Result<(), ParseError> {
        (**self).on_chunk(size, extension)
    }

    fn on_body(&mut self, data: &[u8]) -> Result<(), ParseError> {
        (**self).on_body(data)
    }

    fn on_body_prepare(&mut self, size: usize) -> Result<&mut [u8], ParseError> {
        (**self).on_body_prepare(size)
    }

    fn on_body_commit(&mut self, size: usize) -> Result<(), ParseError> {
        (**self).on_body_commit(size)
    }

    fn on_body_end(&mut self) -> Result<(), ParseError> {
        (**self).on_body_end()
    }

    fn on_trailer(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        (**self).on_trailer(name, value)
    }

    fn on_message_end(&mut self) -> Result<(), ParseError> {
        (**self).on_message_end()
    }
}
