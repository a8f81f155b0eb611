//! Exif is a media metadata format primarily used by cameras.
//!
//! It's stored as a little TIFF file: a byte-order marker, a magic number,
//! and a chain of IFDs (Image File Directories). Each IFD field holds a tag,
//! a primitive type, and a count saying how many primitives are stored, so we
//! can read fields without knowing what they mean.
//!
//! We produce one directory per IFD:
//!
//! - IFD 0 becomes [`DirectoryKind::ExifIfd0`],
//! - the Exif sub-IFD it points to becomes [`DirectoryKind::ExifSubIfd`],
//! - the GPS IFD it points to becomes [`DirectoryKind::Gps`],
//! - and IFD 1 (the thumbnail) becomes [`DirectoryKind::ExifThumbnail`].

use webp_metadata_types::{Directory, DirectoryKind};
use winnow::binary::Endianness;

use crate::reader::ByteReader;

use self::ifd::parse_ifd;
pub use self::error::{ExifError, ExifFieldError};

use super::EmbeddedDecoder;

mod error;
mod ifd;

/// TIFF's magic number, right after the byte order marker.
const TIFF_MAGIC_NUMBER: u16 = 42;

/// The built-in Exif decoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExifDecoder;

impl EmbeddedDecoder for ExifDecoder {
    fn extract(&self, payload: &[u8], start_offset: usize) -> Vec<Directory> {
        match parse_exif(payload, start_offset) {
            Ok(directories) => directories,
            Err(e) => {
                log::error!("Failed to parse Exif! err: {e}");
                vec![Directory::error(DirectoryKind::ExifIfd0, e.to_string())]
            }
        }
    }
}

/// Parses the TIFF stream at `payload[start_offset..]` into directories.
///
/// # Errors
///
/// Fails if the TIFF header or IFD 0 can't be read. Any other IFD that fails
/// becomes an error directory of its kind instead.
pub fn parse_exif(payload: &[u8], start_offset: usize) -> Result<Vec<Directory>, ExifError> {
    let blob: &[u8] = payload
        .get(start_offset..)
        .ok_or(ExifError::StartPastEnd {
            start: start_offset,
            len: payload.len(),
        })?;

    let reader = ByteReader::new(blob, parse_blob_endianness(blob)?);

    // ensure we've got a TIFF marker (magic number)
    let magic_number = reader.u16_at(2).map_err(|e| {
        log::error!("Couldn't find TIFF magic number! err: {e}");
        ExifError::NoTiffMagicNumber
    })?;
    if magic_number != TIFF_MAGIC_NUMBER {
        log::error!("Magic number wasn't for TIFF. got: `{magic_number}`");
        return Err(ExifError::MagicNumberWasntTiff {
            found: magic_number,
        });
    }

    // offsets are relative to the start of the TIFF header
    let ifd0_offset = reader.u32_at(4).map_err(|e| {
        log::error!("Didn't find a TIFF header offset! err: {e}");
        ExifError::NoTiffHeaderOffset
    })?;
    log::trace!("IFD 0 is at `{ifd0_offset}`.");

    // parse out the first IFD (it tells us where the rest are)
    let ifd0 = parse_ifd(&reader, ifd0_offset, DirectoryKind::ExifIfd0)?;
    let mut visited: Vec<u32> = vec![ifd0_offset];
    let mut directories: Vec<Directory> = vec![ifd0.directory];

    let linked = ifd0
        .sub_ifds
        .into_iter()
        .chain(ifd0.next.map(|ptr| (DirectoryKind::ExifThumbnail, ptr)));

    for (kind, offset) in linked {
        if visited.contains(&offset) {
            log::warn!("`{kind}` points back to an IFD we've already read (`{offset}`). Skipping.");
            continue;
        }
        visited.push(offset);

        log::trace!("Following pointer to `{kind}` at `{offset}`.");
        match parse_ifd(&reader, offset, kind) {
            Ok(parsed) => directories.push(parsed.directory),
            Err(e) => {
                log::error!("Failed to parse `{kind}`. err: {e}");
                directories.push(Directory::error(kind, e.to_string()));
            }
        }
    }

    Ok(directories)
}

/// Finds the endianness of the Exif blob.
fn parse_blob_endianness(blob: &[u8]) -> Result<Endianness, ExifError> {
    match blob {
        [b'I', b'I', ..] => Ok(Endianness::Little),
        [b'M', b'M', ..] => Ok(Endianness::Big),
        [a, b, ..] => {
            let e = ExifError::WeirdByteOrderMarker { found: [*a, *b] };
            log::error!("Couldn't parse out Exif! err: {e}");
            Err(e)
        }
        _ => Err(ExifError::NoByteOrderMarker { len: blob.len() }),
    }
}
