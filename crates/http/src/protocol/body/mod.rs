//! Body storage for parsed messages.
//!
//! The parser never stores body bytes itself. Every body byte is handed to a [`BodyReader`],
//! which exclusively owns the storage. Three readers are provided:
//!
//! - [`BufferedBody`]: accumulates the body in memory, optionally bounded by a maximum size
//! - [`DiscardBody`]: counts the bytes and drops them
//! - [`StreamingBody`]: forwards every committed region to an [`std::io::Write`] sink
//!
//! # Contract
//!
//! A reader sees `init` once when the body begins, then any number of `prepare`/`commit`
//! pairs, then `finish` once when the body is complete. `prepare` may hand back a region
//! shorter than requested, so writers loop until their data is committed. Regions never
//! nest: a second `prepare` before the previous region is committed fails with
//! [`ParseError::BodyRegionPending`].

mod buffered;
mod discard;
mod streaming;

pub use buffered::BufferedBody;
pub use discard::DiscardBody;
pub use streaming::StreamingBody;

use crate::ensure;
use crate::protocol::ParseError;

/// Storage for the body of a message being parsed.
pub trait BodyReader {
    /// Called once when body parsing begins. `content_length` is `None` for chunked and
    /// close-delimited bodies.
    fn init(&mut self, content_length: Option<u64>) -> Result<(), ParseError>;

    /// Returns a writable region of at most `size` bytes owned by this reader.
    fn prepare(&mut self, size: usize) -> Result<&mut [u8], ParseError>;

    /// Finalizes the first `size` bytes of the region returned by the last `prepare`.
    fn commit(&mut self, size: usize) -> Result<(), ParseError>;

    /// Called once when the body is fully parsed.
    fn finish(&mut self) -> Result<(), ParseError>;
}

/// Copies `data` into `reader`, looping over as many prepare/commit rounds as the reader needs.
pub(crate) fn write_all<R: BodyReader + ?Sized>(reader: &mut R, mut data: &[u8]) -> Result<(), ParseError> {
    while !data.is_empty() {
        let region = reader.prepare(data.len())?;
        let n = region.len().min(data.len());
        ensure!(n > 0, ParseError::io(std::io::Error::from(std::io::ErrorKind::WriteZero)));
        region[..n].copy_from_slice(&data[..n]);
        reader.commit(n)?;
        data = &data[n..];
    }
    Ok(())
}

/// Tracks the one outstanding region a reader has handed out.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PendingRegion(Option<usize>);

impl PendingRegion {
    pub(crate) fn open(&mut self, len: usize) -> Result<(), ParseError> {
        ensure!(self.0.is_none(), ParseError::BodyRegionPending);
        self.0 = Some(len);
        Ok(())
    }

    /// Closes the region, returning its prepared length.
    pub(crate) fn close(&mut self, committed: usize) -> Result<usize, ParseError> {
        match self.0.take() {
            Some(len) if committed <= len => Ok(len),
            _ => Err(ParseError::NoBodyRemaining),
        }
    }
}
