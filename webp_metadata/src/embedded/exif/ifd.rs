use webp_metadata_types::{Directory, DirectoryKind, Rational, TagValue, tags::exif};

use crate::{error::ReadError, reader::ByteReader};

use super::error::{ExifError, ExifFieldError};

/// Each IFD entry is this many bytes: tag, type, count, and value/offset.
const ENTRY_LEN: usize = 12;

/// The TIFF field types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PrimitiveTy {
    Byte,
    Ascii,
    Short,
    Long,
    Rational,
    SByte,
    Undefined,
    SShort,
    SLong,
    SRational,
    Float,
    Double,
}

impl PrimitiveTy {
    fn from_raw(raw: u16) -> Option<Self> {
        Some(match raw {
            1 => Self::Byte,
            2 => Self::Ascii,
            3 => Self::Short,
            4 => Self::Long,
            5 => Self::Rational,
            6 => Self::SByte,
            7 => Self::Undefined,
            8 => Self::SShort,
            9 => Self::SLong,
            10 => Self::SRational,
            11 => Self::Float,
            12 => Self::Double,
            _ => return None,
        })
    }

    /// The size of one value of this type.
    const fn size_bytes(&self) -> usize {
        match self {
            Self::Byte | Self::Ascii | Self::SByte | Self::Undefined => 1,
            Self::Short | Self::SShort => 2,
            Self::Long | Self::SLong | Self::Float => 4,
            Self::Rational | Self::SRational | Self::Double => 8,
        }
    }
}

/// An IFD pulled out of the Exif data.
#[derive(Debug)]
pub(super) struct ParsedIfd {
    pub directory: Directory,

    /// Sub-IFDs this one points to, in the order they were found.
    pub sub_ifds: Vec<(DirectoryKind, u32)>,

    /// Where the next IFD in the chain lives, if anywhere.
    pub next: Option<u32>,
}

/// Reads the IFD at `offset`.
///
/// Entries that can't be read are logged and skipped. Only a missing or
/// truncated entry table fails the whole IFD.
pub(super) fn parse_ifd(
    reader: &ByteReader,
    offset: u32,
    kind: DirectoryKind,
) -> Result<ParsedIfd, ExifError> {
    let base = offset as usize;
    let entry_count: u16 = reader.u16_at(base).map_err(|e| {
        log::error!("Couldn't find count on IFD - ran out of data! err: {e}");
        ExifError::IfdNoEntryCount { offset }
    })?;

    let table_len = usize::from(entry_count) * ENTRY_LEN;
    if reader.bytes_at(base + 2, table_len).is_err() {
        log::error!("IFD at `{offset}` says it has `{entry_count}` entries, but they don't fit.");
        return Err(ExifError::IfdTruncated {
            offset,
            entries: entry_count,
        });
    }

    log::trace!("Parsing `{entry_count}` fields for `{kind}`...");
    let mut directory = Directory::new(kind);
    let mut sub_ifds = Vec::new();
    for i in 0..usize::from(entry_count) {
        let (tag, value) = match parse_entry(reader, base + 2 + i * ENTRY_LEN) {
            Ok(field) => field,
            Err(e) => {
                log::warn!("Skipping field in `{kind}`. err: {e}");
                continue;
            }
        };

        // only IFD 0 links out to other IFDs
        if kind == DirectoryKind::ExifIfd0 {
            let sub_kind = match u32::from(tag) {
                exif::EXIF_OFFSET => Some(DirectoryKind::ExifSubIfd),
                exif::GPS_INFO_OFFSET => Some(DirectoryKind::Gps),
                _ => None,
            };

            match (sub_kind, value.as_int().and_then(|p| u32::try_from(p).ok())) {
                (Some(sub_kind), Some(pointer)) => sub_ifds.push((sub_kind, pointer)),
                (Some(sub_kind), None) => {
                    log::warn!("Pointer to `{sub_kind}` wasn't a single integer. Not following it.")
                }
                (None, _) => (),
            }
        }

        directory.set(u32::from(tag), value);
    }

    // a missing pointer just ends the chain
    let next = match reader.u32_at(base + 2 + table_len) {
        Ok(0) => None,
        Ok(ptr) => Some(ptr),
        Err(e) => {
            log::warn!("IFD didn't contain a pointer to the next IFD. err: {e}");
            None
        }
    };

    Ok(ParsedIfd {
        directory,
        sub_ifds,
        next,
    })
}

/// Parses one 12-byte entry.
fn parse_entry(reader: &ByteReader, at: usize) -> Result<(u16, TagValue), ExifFieldError> {
    let in_table = |source| ExifFieldError::EntryOutOfBounds { source };
    let tag: u16 = reader.u16_at(at).map_err(in_table)?;
    let raw_ty: u16 = reader.u16_at(at + 2).map_err(in_table)?;
    let count: u32 = reader.u32_at(at + 4).map_err(in_table)?;

    let ty = PrimitiveTy::from_raw(raw_ty)
        .ok_or(ExifFieldError::UnknownType { tag, got: raw_ty })?;

    let total_size = usize::try_from(count)
        .ok()
        .and_then(|count| count.checked_mul(ty.size_bytes()))
        .ok_or(ExifFieldError::CountTooLarge { tag, count })?;

    // values that fit in four bytes are stored inline
    let data_offset = if total_size > 4 {
        reader.u32_at(at + 8).map_err(in_table)? as usize
    } else {
        at + 8
    };

    log::trace!(
        "(field info...
    tag: {tag:#06x},
    ty: {ty:?},
    count: {count},
    data at: {data_offset}
)"
    );

    let value = parse_value(reader, ty, count as usize, data_offset)
        .map_err(|source| ExifFieldError::ValueOutOfBounds { tag, source })?;
    Ok((tag, value))
}

/// Reads `count` values of type `ty` starting at `at`.
fn parse_value(
    reader: &ByteReader,
    ty: PrimitiveTy,
    count: usize,
    at: usize,
) -> Result<TagValue, ReadError> {
    let size = ty.size_bytes();
    let bytes = reader.bytes_at(at, count * size)?;

    let value = match ty {
        PrimitiveTy::Byte | PrimitiveTy::Undefined => match bytes {
            [single] => TagValue::Int((*single).into()),
            _ => TagValue::Bytes(bytes.to_vec()),
        },

        PrimitiveTy::Ascii => {
            let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
            TagValue::Str(String::from_utf8_lossy(&bytes[..end]).into_owned())
        }

        PrimitiveTy::Float | PrimitiveTy::Double => TagValue::Bytes(bytes.to_vec()),

        PrimitiveTy::Short
        | PrimitiveTy::Long
        | PrimitiveTy::SByte
        | PrimitiveTy::SShort
        | PrimitiveTy::SLong => {
            let mut ints: Vec<i64> = Vec::with_capacity(count);
            for i in 0..count {
                let offset = at + i * size;
                ints.push(match ty {
                    PrimitiveTy::Short => reader.u16_at(offset)?.into(),
                    PrimitiveTy::Long => reader.u32_at(offset)?.into(),
                    PrimitiveTy::SByte => (reader.u8_at(offset)? as i8).into(),
                    PrimitiveTy::SShort => (reader.u16_at(offset)? as i16).into(),
                    _ => reader.i32_at(offset)?.into(),
                });
            }
            match ints.as_slice() {
                [single] => TagValue::Int(*single),
                _ => TagValue::Ints(ints),
            }
        }

        PrimitiveTy::Rational | PrimitiveTy::SRational => {
            let mut rationals: Vec<Rational> = Vec::with_capacity(count);
            for i in 0..count {
                let offset = at + i * size;
                rationals.push(if ty == PrimitiveTy::Rational {
                    Rational::new(
                        reader.u32_at(offset)?.into(),
                        reader.u32_at(offset + 4)?.into(),
                    )
                } else {
                    Rational::new(
                        reader.i32_at(offset)?.into(),
                        reader.i32_at(offset + 4)?.into(),
                    )
                });
            }
            match rationals.as_slice() {
                [single] => TagValue::Rational(*single),
                _ => TagValue::Rationals(rationals),
            }
        }
    };

    Ok(value)
}
