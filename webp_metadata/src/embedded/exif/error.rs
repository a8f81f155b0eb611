use crate::error::ReadError;

/// Exif decoding failed, and the directory being read is lost.
///
/// For IFD 0 (and the header before it), that means no Exif data at all.
/// For the other IFDs, only that IFD is lost.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExifError {
    /// The Exif data would start past the end of the chunk.
    StartPastEnd { start: usize, len: usize },

    /// The input was too short to provide a byte order marker.
    NoByteOrderMarker { len: usize },

    /// The byte order marker wasn't `II` or `MM`.
    WeirdByteOrderMarker { found: [u8; 2] },

    /// Didn't find the TIFF magic number.
    NoTiffMagicNumber,

    /// The magic number wasn't TIFF's (42).
    MagicNumberWasntTiff { found: u16 },

    /// No offset to IFD 0 was found.
    NoTiffHeaderOffset,

    /// The IFD didn't say how many entries it has.
    IfdNoEntryCount { offset: u32 },

    /// The IFD's entries run past the end of the data.
    IfdTruncated { offset: u32, entries: u16 },
}

impl core::fmt::Display for ExifError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::StartPastEnd { start, len } => write!(
                f,
                "Exif data should start at `{start}`, but the chunk is only `{len}` byte(s) long."
            ),
            Self::NoByteOrderMarker { len } => {
                write!(f, "No byte order marker was found. len: `{len}`")
            }
            Self::WeirdByteOrderMarker { found } => match core::str::from_utf8(found) {
                Ok(found_utf8_bom) => write!(f, "Got a weird byte-order marker: `{found_utf8_bom}`"),
                Err(_) => write!(f, "Got a weird byte-order marker - wasn't ASCII: {found:?}"),
            },
            Self::NoTiffMagicNumber => {
                f.write_str("No TIFF magic number found - the data was likely cut short.")
            }
            Self::MagicNumberWasntTiff { found } => {
                write!(f, "Magic number was not TIFF! got: `{found}`")
            }
            Self::NoTiffHeaderOffset => f.write_str("No offset to the first IFD was found."),
            Self::IfdNoEntryCount { offset } => write!(
                f,
                "The IFD at `{offset}` didn't say how many entries it has."
            ),
            Self::IfdTruncated { offset, entries } => write!(
                f,
                "The IFD at `{offset}` claims `{entries}` entries, but they run past the end of the data."
            ),
        }
    }
}

impl core::error::Error for ExifError {}

/// One entry in an IFD couldn't be read. The rest of the IFD is still fine.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExifFieldError {
    /// The entry itself couldn't be read.
    EntryOutOfBounds { source: ReadError },

    /// Encountered a type that TIFF doesn't define.
    UnknownType { tag: u16, got: u16 },

    /// The entry's values are too big to address.
    CountTooLarge { tag: u16, count: u32 },

    /// The entry's values point outside the data.
    ValueOutOfBounds { tag: u16, source: ReadError },
}

impl core::fmt::Display for ExifFieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EntryOutOfBounds { source } => write!(f, "Couldn't read IFD entry. err: {source}"),
            Self::UnknownType { tag, got } => {
                write!(f, "Field `{tag:#06x}` has an unknown type! got: `{got}`")
            }
            Self::CountTooLarge { tag, count } => {
                write!(f, "Field `{tag:#06x}` holds too many values. count: `{count}`")
            }
            Self::ValueOutOfBounds { tag, source } => {
                write!(f, "Couldn't read the value of field `{tag:#06x}`. err: {source}")
            }
        }
    }
}

impl core::error::Error for ExifFieldError {}
