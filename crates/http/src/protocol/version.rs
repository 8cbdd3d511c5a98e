//! HTTP version as written on the start-line.

use std::fmt;

use http::Version;

/// The `HTTP/<major>.<minor>` pair of a start-line.
///
/// Any single-digit pair is representable; only `1.0` and `1.1` carry HTTP/1.x semantics
/// (keep-alive defaults, chunked coding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HttpVersion {
    pub major: u8,
    pub minor: u8,
}

impl HttpVersion {
    pub const HTTP_10: HttpVersion = HttpVersion { major: 1, minor: 0 };
    pub const HTTP_11: HttpVersion = HttpVersion { major: 1, minor: 1 };

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Whether connections are persistent unless `Connection: close` says otherwise.
    #[inline]
    pub fn is_keep_alive_default(self) -> bool {
        self >= Self::HTTP_11
    }
}

impl Default for HttpVersion {
    fn default() -> Self {
        Self::HTTP_11
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

impl TryFrom<HttpVersion> for Version {
    type Error = HttpVersion;

    fn try_from(value: HttpVersion) -> Result<Self, Self::Error> {
        match (value.major, value.minor) {
            (0, 9) => Ok(Version::HTTP_09),
            (1, 0) => Ok(Version::HTTP_10),
            (1, 1) => Ok(Version::HTTP_11),
            (2, 0) => Ok(Version::HTTP_2),
            (3, 0) => Ok(Version::HTTP_3),
            _ => Err(value),
        }
    }
}
