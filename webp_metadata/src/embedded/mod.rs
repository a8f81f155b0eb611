//! # Embedded formats
//!
//! WebP files carry three metadata blocks verbatim in their own chunks:
//!
//! - Exif (`EXIF`), a TIFF-structured binary block from cameras,
//! - ICC (`ICCP`), a color profile,
//! - and XMP (`XMP `), an XML packet.
//!
//! Each one is decoded by an [`EmbeddedDecoder`]. The built-in decoders live
//! in this module, but you can swap any of them out through
//! [`EmbeddedDecoders`].

use webp_metadata_types::Directory;

pub use self::{exif::ExifDecoder, icc::IccDecoder, xmp::XmpDecoder};

pub mod exif;
pub mod icc;
pub mod xmp;

/// Decodes one embedded metadata format into directories.
pub trait EmbeddedDecoder: core::fmt::Debug {
    /// Decodes `payload`, starting at `start_offset`.
    ///
    /// This must not panic on malformed input. It should always return at
    /// least one directory. If decoding fails, that's an error-only directory
    /// (see [`Directory::error`]).
    fn extract(&self, payload: &[u8], start_offset: usize) -> Vec<Directory>;
}

/// The decoders used for each embedded format.
///
/// The default uses the decoders in this module.
#[derive(Debug)]
pub struct EmbeddedDecoders {
    pub exif: Box<dyn EmbeddedDecoder>,
    pub icc: Box<dyn EmbeddedDecoder>,
    pub xmp: Box<dyn EmbeddedDecoder>,
}

impl EmbeddedDecoders {
    pub fn with_exif(mut self, decoder: impl EmbeddedDecoder + 'static) -> Self {
        self.exif = Box::new(decoder);
        self
    }

    pub fn with_icc(mut self, decoder: impl EmbeddedDecoder + 'static) -> Self {
        self.icc = Box::new(decoder);
        self
    }

    pub fn with_xmp(mut self, decoder: impl EmbeddedDecoder + 'static) -> Self {
        self.xmp = Box::new(decoder);
        self
    }
}

impl Default for EmbeddedDecoders {
    fn default() -> Self {
        Self {
            exif: Box::new(ExifDecoder),
            icc: Box::new(IccDecoder),
            xmp: Box::new(XmpDecoder),
        }
    }
}

/// The preamble in front of Exif data in a JPEG `APP1` segment.
///
/// Some tools copy the whole segment into WebP's `EXIF` chunk, rather than
/// just the TIFF data that should be there.
pub const EXIF_PREAMBLE: &[u8; 6] = b"Exif\0\0";

/// Where the TIFF data in an `EXIF` chunk begins.
pub fn exif_start_offset(payload: &[u8]) -> usize {
    if payload.starts_with(EXIF_PREAMBLE) {
        log::debug!("`EXIF` chunk has a JPEG preamble. Skipping past it.");
        EXIF_PREAMBLE.len()
    } else {
        0
    }
}
