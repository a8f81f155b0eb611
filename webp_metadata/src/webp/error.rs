use webp_metadata_types::{Directory, DirectoryKind};

use crate::{error::ReadError, riff::FourCc};

/// A header chunk passed its structural checks, but reading it failed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WebpDecodeError {
    /// The chunk being decoded.
    pub chunk: FourCc,

    /// What went wrong.
    pub source: ReadError,
}

impl WebpDecodeError {
    /// Turns this error into an error-only `WebP` directory.
    pub fn into_directory(self) -> Directory {
        Directory::error(DirectoryKind::Webp, self.to_string())
    }
}

impl core::fmt::Display for WebpDecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Failed to decode the `{}` chunk. err: {}",
            self.chunk, self.source
        )
    }
}

impl core::error::Error for WebpDecodeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.source)
    }
}
