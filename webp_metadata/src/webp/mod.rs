//! # WebP
//!
//! WebP is a RIFF container (form type `WEBP`) holding an image bitstream and,
//! optionally, some metadata chunks.
//!
//! This module finds the image's size (from whichever of `VP8X`, `VP8L`, or
//! `VP8 ` are present) and hands any `EXIF`, `ICCP`, or `XMP ` chunks off to
//! the [embedded decoders](crate::embedded).
//!
//! ```
//! use webp_metadata::webp::read_metadata;
//!
//! // not a WebP file...
//! assert!(read_metadata(&[0_u8; 4]).is_err());
//! ```

use webp_metadata_types::Directory;

use crate::{
    collector::Collector,
    embedded::EmbeddedDecoders,
    riff::{self, RiffError},
};

pub use self::{
    dimensions::{DimensionResult, ImageInfo},
    error::WebpDecodeError,
    handler::{WebpHandler, process},
    kind::ChunkKind,
};

pub mod dimensions;
mod error;
mod handler;
mod kind;

/// Reads every directory from a WebP file, using the built-in embedded
/// decoders.
///
/// # Errors
///
/// Fails only if the input isn't a RIFF file at all. Problems inside the
/// file are reported as error directories in the returned [`Collector`].
pub fn read_metadata(input: &impl AsRef<[u8]>) -> Result<Collector, RiffError> {
    read_metadata_with(input, &EmbeddedDecoders::default())
}

/// Like [`read_metadata`], but with your choice of embedded decoders.
pub fn read_metadata_with(
    input: &impl AsRef<[u8]>,
    decoders: &EmbeddedDecoders,
) -> Result<Collector, RiffError> {
    let mut out = Collector::new();
    let mut handler = WebpHandler::new(&mut out, decoders);
    riff::walk(input.as_ref(), &mut handler)?;

    log::debug!("Read `{}` directories from WebP file.", out.len());
    Ok(out)
}

/// Convenience for callers that only want the directories.
pub fn read_directories(input: &impl AsRef<[u8]>) -> Result<Vec<Directory>, RiffError> {
    read_metadata(input).map(Collector::into_inner)
}
