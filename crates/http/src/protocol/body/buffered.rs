use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;

use super::{BodyReader, PendingRegion};

/// Upper bound on the capacity reserved up front from a declared content length.
const MAX_INITIAL_RESERVE: u64 = 64 * 1024;

/// In-memory body storage backed by a [`BytesMut`].
///
/// With [`with_limit`](BufferedBody::with_limit) the body is bounded: a declared content length
/// above the limit fails in `init`, and chunked or close-delimited bodies fail as soon as the
/// committed bytes cross it. Both report [`ParseError::TooLargeBody`].
#[derive(Debug, Default)]
pub struct BufferedBody {
    buf: BytesMut,
    limit: Option<u64>,
    region: PendingRegion,
}

impl BufferedBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: u64) -> Self {
        Self { limit: Some(limit), ..Self::default() }
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

impl AsRef<[u8]> for BufferedBody {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl BodyReader for BufferedBody {
    fn init(&mut self, content_length: Option<u64>) -> Result<(), ParseError> {
        if let Some(length) = content_length {
            if let Some(limit) = self.limit {
                ensure!(length <= limit, ParseError::too_large_body(length, limit));
            }
            // a declared length is attacker controlled, reserve lazily past this point
            let reserve = usize::try_from(length.min(MAX_INITIAL_RESERVE)).unwrap_or(0);
            self.buf.reserve(reserve);
        }
        Ok(())
    }

    fn prepare(&mut self, size: usize) -> Result<&mut [u8], ParseError> {
        self.region.open(size)?;
        let start = self.buf.len();
        self.buf.resize(start + size, 0);
        Ok(&mut self.buf[start..])
    }

    fn commit(&mut self, size: usize) -> Result<(), ParseError> {
        let prepared = self.region.close(size)?;
        let start = self.buf.len() - prepared;
        self.buf.truncate(start + size);

        if let Some(limit) = self.limit {
            let current = self.buf.len() as u64;
            ensure!(current <= limit, ParseError::too_large_body(current, limit));
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        trace!(len = self.buf.len(), "buffered body finished");
        Ok(())
    }
}
