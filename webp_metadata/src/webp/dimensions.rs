//! Reads the canvas size (and, for `VP8X`, feature flags) out of the three
//! WebP header chunks.
//!
//! Each decoder returns:
//!
//! - `None` if the chunk doesn't look like what it claims to be (wrong length,
//!   wrong signature). These chunks are skipped without a trace.
//! - `Some(Ok(..))` with everything it read.
//! - `Some(Err(..))` if a read failed partway through. Nothing partially read
//!   is kept.
//!
//! For the bitstream layouts, see:
//! <https://developers.google.com/speed/webp/docs/riff_container>

use webp_metadata_types::{Directory, DirectoryKind, TagValue, tags::webp};

use crate::{error::ReadError, reader::ByteReader};

/// What a dimension decoder found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,

    /// Only `VP8X` says whether there's an alpha channel.
    pub has_alpha: Option<bool>,

    /// Only `VP8X` says whether the image is animated.
    pub is_animation: Option<bool>,
}

impl ImageInfo {
    /// Builds the `WebP` directory for this info.
    pub fn into_directory(self) -> Directory {
        let mut dir = Directory::new(DirectoryKind::Webp)
            .with(webp::IMAGE_WIDTH, TagValue::Int(self.width.into()))
            .with(webp::IMAGE_HEIGHT, TagValue::Int(self.height.into()));

        if let Some(has_alpha) = self.has_alpha {
            dir.set(webp::HAS_ALPHA, TagValue::Bool(has_alpha));
        }
        if let Some(is_animation) = self.is_animation {
            dir.set(webp::IS_ANIMATION, TagValue::Bool(is_animation));
        }

        dir
    }
}

/// The outcome of a dimension decoder. See the module docs.
pub type DimensionResult = Option<Result<ImageInfo, ReadError>>;

/// `VP8X` payloads are always this long.
const EXTENDED_HEADER_LEN: usize = 10;

/// `VP8L` needs its signature plus four bytes of packed size.
const LOSSLESS_HEADER_MIN_LEN: usize = 5;
const LOSSLESS_SIGNATURE: u8 = 0x2F;

/// `VP8 ` needs its frame tag, start code, and two sizes.
const LOSSY_HEADER_MIN_LEN: usize = 10;
const LOSSY_START_CODE: [u8; 3] = [0x9D, 0x01, 0x2A];

/// Bit positions in the `VP8X` flags byte, counted from its most
/// significant bit.
///
/// So animation is `0x40` and alpha is `0x08`. This differs from the public
/// container layout, where alpha is `0x10` and animation is `0x02`.
const ANIMATION_BIT: usize = 1;
const ALPHA_BIT: usize = 4;

/// Decodes a `VP8X` (extended header) payload.
///
/// ```text
/// byte 0      flags (see `ANIMATION_BIT` and `ALPHA_BIT`)
/// bytes 1..4  reserved
/// bytes 4..7  canvas width - 1  (u24, LE)
/// bytes 7..10 canvas height - 1 (u24, LE)
/// ```
pub fn extended_header(payload: &[u8]) -> DimensionResult {
    if payload.len() != EXTENDED_HEADER_LEN {
        log::trace!(
            "`VP8X` payload is `{}` bytes, but it should be `{EXTENDED_HEADER_LEN}`. Skipping.",
            payload.len()
        );
        return None;
    }

    let reader = ByteReader::little_endian(payload);
    Some(read_extended_header(&reader))
}

fn read_extended_header(reader: &ByteReader) -> Result<ImageInfo, ReadError> {
    let is_animation = reader.bit_at(ANIMATION_BIT)?;
    let has_alpha = reader.bit_at(ALPHA_BIT)?;
    let width_minus_one = reader.u24_at(4)?;
    let height_minus_one = reader.u24_at(7)?;

    Ok(ImageInfo {
        width: width_minus_one + 1,
        height: height_minus_one + 1,
        has_alpha: Some(has_alpha),
        is_animation: Some(is_animation),
    })
}

/// Decodes a `VP8L` (lossless) header.
///
/// After the signature byte come four bytes of packed sizes:
///
/// ```text
/// byte 1: wwwwwwww
/// byte 2: hhwwwwww
/// byte 3: hhhhhhhh
/// byte 4: ....hhhh
/// ```
///
/// Both are 14-bit "size - 1" values. Width's low byte is byte 1; height's
/// two lowest bits are the top of byte 2.
pub fn lossless_header(payload: &[u8]) -> DimensionResult {
    if payload.len() < LOSSLESS_HEADER_MIN_LEN {
        log::trace!("`VP8L` payload is only `{}` bytes. Skipping.", payload.len());
        return None;
    }

    let reader = ByteReader::little_endian(payload);
    if reader.u8_at(0).ok()? != LOSSLESS_SIGNATURE {
        log::trace!("`VP8L` payload has the wrong signature. Skipping.");
        return None;
    }

    Some(read_lossless_header(&reader))
}

fn read_lossless_header(reader: &ByteReader) -> Result<ImageInfo, ReadError> {
    let b1 = u32::from(reader.u8_at(1)?);
    let b2 = u32::from(reader.u8_at(2)?);
    let b3 = u32::from(reader.u8_at(3)?);
    let b4 = u32::from(reader.u8_at(4)?);

    let width_minus_one = ((b2 & 0x3F) << 8) | b1;
    let height_minus_one = ((b4 & 0x0F) << 10) | (b3 << 2) | ((b2 & 0xC0) >> 6);

    Ok(ImageInfo {
        width: width_minus_one + 1,
        height: height_minus_one + 1,
        has_alpha: None,
        is_animation: None,
    })
}

/// Decodes a `VP8 ` (lossy) key frame header.
///
/// ```text
/// bytes 0..3  frame tag
/// bytes 3..6  start code (9D 01 2A)
/// bytes 6..8  width  (u16, LE)
/// bytes 8..10 height (u16, LE)
/// ```
///
/// The top two bits of each size are really a scaling factor. They're
/// reported as part of the size.
pub fn lossy_header(payload: &[u8]) -> DimensionResult {
    if payload.len() < LOSSY_HEADER_MIN_LEN {
        log::trace!("`VP8 ` payload is only `{}` bytes. Skipping.", payload.len());
        return None;
    }

    let reader = ByteReader::little_endian(payload);
    if reader.bytes_at(3, LOSSY_START_CODE.len()).ok()? != LOSSY_START_CODE {
        log::trace!("`VP8 ` payload has the wrong start code. Skipping.");
        return None;
    }

    Some(read_lossy_header(&reader))
}

fn read_lossy_header(reader: &ByteReader) -> Result<ImageInfo, ReadError> {
    let width = reader.u16_at(6)?;
    let height = reader.u16_at(8)?;

    Ok(ImageInfo {
        width: width.into(),
        height: height.into(),
        has_alpha: None,
        is_animation: None,
    })
}
