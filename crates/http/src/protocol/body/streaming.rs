use std::io::Write;

use tracing::trace;

use crate::protocol::ParseError;

use super::{BodyReader, PendingRegion};

const SCRATCH_SIZE: usize = 16 * 1024;

/// Forwards the body to a [`Write`] sink as it is parsed.
///
/// Memory use is bounded by a fixed scratch region regardless of body size. A write or flush
/// failure from the sink aborts parsing with [`ParseError::Io`] carrying the sink's error.
#[derive(Debug)]
pub struct StreamingBody<W> {
    sink: W,
    scratch: Vec<u8>,
    written: u64,
    content_length: Option<u64>,
    region: PendingRegion,
}

impl<W: Write> StreamingBody<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, scratch: Vec::new(), written: 0, content_length: None, region: PendingRegion::default() }
    }

    /// Bytes forwarded to the sink so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Length hint received when the body began, if the framing declared one.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write + Default> Default for StreamingBody<W> {
    fn default() -> Self {
        Self::new(W::default())
    }
}

impl<W: Write> BodyReader for StreamingBody<W> {
    fn init(&mut self, content_length: Option<u64>) -> Result<(), ParseError> {
        self.content_length = content_length;
        Ok(())
    }

    fn prepare(&mut self, size: usize) -> Result<&mut [u8], ParseError> {
        let size = size.min(SCRATCH_SIZE);
        self.region.open(size)?;
        if self.scratch.len() < size {
            self.scratch.resize(size, 0);
        }
        Ok(&mut self.scratch[..size])
    }

    fn commit(&mut self, size: usize) -> Result<(), ParseError> {
        self.region.close(size)?;
        self.sink.write_all(&self.scratch[..size])?;
        self.written += size as u64;
        trace!(len = size, total = self.written, "forwarded body bytes");
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        self.sink.flush()?;
        Ok(())
    }
}
