use tracing::trace;

use crate::protocol::ParseError;

use super::{BodyReader, PendingRegion};

const SCRATCH_SIZE: usize = 8 * 1024;

/// Counts body bytes without keeping them.
///
/// Useful when the body must be read off the wire to keep the connection in sync but its
/// content is not wanted. Regions are handed out from a small scratch buffer that is
/// overwritten on every `prepare`.
#[derive(Debug, Default)]
pub struct DiscardBody {
    scratch: Vec<u8>,
    len: u64,
    region: PendingRegion,
}

impl DiscardBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of body bytes committed so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl BodyReader for DiscardBody {
    fn init(&mut self, _content_length: Option<u64>) -> Result<(), ParseError> {
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
        self.len += size as u64;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        trace!(len = self.len, "discarded body");
        Ok(())
    }
}
