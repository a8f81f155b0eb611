//! ICC color profiles.
//!
//! A profile is a 128-byte header, a tag count, and a table of tag elements.
//! Everything is big-endian. We report the header's fields (keyed by their
//! byte offset) and every tag element (keyed by its signature).
//!
//! See the ICC.1 specification for the layout: <https://www.color.org/specification/ICC.1-2022-05.pdf>

use webp_metadata_types::{Directory, DirectoryKind, TagValue, tags::icc};

use crate::{error::ReadError, reader::ByteReader};

use super::EmbeddedDecoder;

/// Every profile starts with a header this long.
const HEADER_LEN: usize = 128;

/// Where the tag table starts, just after the tag count.
const TAG_TABLE_START: usize = 132;

/// Each tag table element: signature, offset, and size.
const TAG_ELEMENT_LEN: usize = 12;

/// The profile file signature, at [`icc::SIGNATURE`].
const PROFILE_SIGNATURE: [u8; 4] = *b"acsp";

/// Problems that stop us from reading a profile.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IccError {
    /// The profile is shorter than its header.
    TooShort { len: usize },

    /// The `acsp` signature wasn't where it should be.
    BadSignature { found: [u8; 4] },

    /// The header couldn't be read.
    Read(ReadError),
}

impl core::fmt::Display for IccError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TooShort { len } => write!(
                f,
                "ICC profile is only `{len}` byte(s) long, but its header alone is `{HEADER_LEN}`."
            ),
            Self::BadSignature { found } => write!(
                f,
                "ICC profile signature should be `acsp`, but got `{}`.",
                String::from_utf8_lossy(found)
            ),
            Self::Read(e) => write!(f, "Failed to read ICC profile header. err: {e}"),
        }
    }
}

impl core::error::Error for IccError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Read(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ReadError> for IccError {
    fn from(value: ReadError) -> Self {
        Self::Read(value)
    }
}

/// The built-in ICC decoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct IccDecoder;

impl EmbeddedDecoder for IccDecoder {
    fn extract(&self, payload: &[u8], start_offset: usize) -> Vec<Directory> {
        let profile = payload.get(start_offset..).unwrap_or_default();

        let directory = parse_profile(profile).unwrap_or_else(|e| {
            log::error!("Failed to parse ICC profile! err: {e}");
            Directory::error(DirectoryKind::Icc, e.to_string())
        });

        vec![directory]
    }
}

/// Reads an ICC profile into one directory.
pub fn parse_profile(profile: &[u8]) -> Result<Directory, IccError> {
    if profile.len() < HEADER_LEN {
        return Err(IccError::TooShort { len: profile.len() });
    }

    let reader = ByteReader::big_endian(profile);
    let signature = reader.fourcc_at(icc::SIGNATURE as usize)?;
    if signature != PROFILE_SIGNATURE {
        return Err(IccError::BadSignature { found: signature });
    }

    let mut dir = Directory::new(DirectoryKind::Icc);
    parse_header(&reader, &mut dir)?;
    parse_tag_table(&reader, &mut dir);

    log::trace!("Read ICC profile with `{}` tag(s).", dir.tag_count());
    Ok(dir)
}

fn parse_header(reader: &ByteReader, dir: &mut Directory) -> Result<(), ReadError> {
    dir.set(icc::PROFILE_BYTE_COUNT, TagValue::Int(reader.u32_at(0)?.into()));

    for tag in [
        icc::CMM_TYPE,
        icc::PROFILE_CLASS,
        icc::COLOR_SPACE,
        icc::PROFILE_CONNECTION_SPACE,
        icc::SIGNATURE,
        icc::DEVICE_MODEL,
    ] {
        dir.set(tag, fourcc_value(reader.fourcc_at(tag as usize)?));
    }

    // zeroes here mean "unspecified"
    for tag in [icc::PLATFORM, icc::DEVICE_MAKE, icc::PROFILE_CREATOR] {
        let fourcc = reader.fourcc_at(tag as usize)?;
        if fourcc != [0; 4] {
            dir.set(tag, fourcc_value(fourcc));
        }
    }

    // the version is BCD-ish: major byte, then minor and bugfix nibbles
    let version = reader.bytes_at(icc::PROFILE_VERSION as usize, 2)?;
    dir.set(
        icc::PROFILE_VERSION,
        TagValue::Str(format!(
            "{}.{}.{}",
            version[0],
            version[1] >> 4,
            version[1] & 0x0F
        )),
    );

    let date = (0..6)
        .map(|i| reader.u16_at(icc::PROFILE_DATE_TIME as usize + i * 2))
        .collect::<Result<Vec<u16>, ReadError>>()?;
    dir.set(
        icc::PROFILE_DATE_TIME,
        TagValue::Str(format!(
            "{:04}:{:02}:{:02} {:02}:{:02}:{:02}",
            date[0], date[1], date[2], date[3], date[4], date[5]
        )),
    );

    dir.set(
        icc::CMM_FLAGS,
        TagValue::Int(reader.u32_at(icc::CMM_FLAGS as usize)?.into()),
    );
    dir.set(
        icc::RENDERING_INTENT,
        TagValue::Int(reader.u32_at(icc::RENDERING_INTENT as usize)?.into()),
    );

    Ok(())
}

/// Reads the tag count and each tag element.
///
/// A missing count means there are no tags. Elements that point outside the
/// profile are skipped.
fn parse_tag_table(reader: &ByteReader, dir: &mut Directory) {
    let Ok(count) = reader.u32_at(icc::TAG_COUNT as usize) else {
        log::warn!("ICC profile has no tag count. Assuming it has no tags.");
        return;
    };
    dir.set(icc::TAG_COUNT, TagValue::Int(count.into()));

    for i in 0..count as usize {
        let at = TAG_TABLE_START + i * TAG_ELEMENT_LEN;
        let element = reader
            .fourcc_at(at)
            .and_then(|sig| Ok((sig, reader.u32_at(at + 4)?, reader.u32_at(at + 8)?)));
        let Ok((signature, offset, size)) = element else {
            log::warn!("ICC tag table ends early, after `{i}` of `{count}` element(s).");
            return;
        };

        let Ok(data) = reader.bytes_at(offset as usize, size as usize) else {
            log::warn!(
                "ICC tag `{}` points outside the profile. Skipping it.",
                String::from_utf8_lossy(&signature)
            );
            continue;
        };

        dir.set(u32::from_be_bytes(signature), tag_element_value(data));
    }
}

/// Text-typed elements become strings. Anything else is kept as bytes.
fn tag_element_value(data: &[u8]) -> TagValue {
    let reader = ByteReader::big_endian(data);
    let Ok(ty) = reader.fourcc_at(0) else {
        return TagValue::Bytes(data.to_vec());
    };

    let text = match &ty {
        // `text`: ASCII after 8 bytes of type + reserved
        b"text" => reader.bytes_at(8, data.len().saturating_sub(8)).ok().map(ascii),

        // `desc`: a length-prefixed ASCII string
        b"desc" => reader
            .u32_at(8)
            .and_then(|len| reader.bytes_at(12, len as usize))
            .ok()
            .map(ascii),

        // `mluc`: we take the first record, which is UTF-16BE
        b"mluc" => first_mluc_record(&reader),

        _ => None,
    };

    match text {
        Some(text) => TagValue::Str(text),
        None => TagValue::Bytes(data.to_vec()),
    }
}

fn first_mluc_record(reader: &ByteReader) -> Option<String> {
    let records = reader.u32_at(8).ok()?;
    if records == 0 {
        return Some(String::new());
    }

    // each record: language, country, length, offset
    let len = reader.u32_at(16 + 4).ok()? as usize;
    let offset = reader.u32_at(16 + 8).ok()? as usize;
    let bytes = reader.bytes_at(offset, len).ok()?;

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    Some(
        String::from_utf16_lossy(&units)
            .trim_end_matches('\0')
            .to_string(),
    )
}

/// Text up to the first NUL.
fn ascii(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Four-character codes are mostly readable, so we store them as text.
fn fourcc_value(fourcc: [u8; 4]) -> TagValue {
    TagValue::Str(
        String::from_utf8_lossy(&fourcc)
            .trim_end_matches(|c: char| c == '\0' || c == ' ')
            .to_string(),
    )
}
