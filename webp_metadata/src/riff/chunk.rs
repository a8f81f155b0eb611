use winnow::{
    ModalResult, Parser as _,
    binary::le_u32,
    error::{ContextError, ParserError},
    token::take,
};

/// A four-character code, like `VP8X` or `LIST`.
///
/// RIFF uses these to name the container's form type and each chunk.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    /// Names a chunk that groups other chunks.
    pub const LIST: Self = Self(*b"LIST");
}

impl From<[u8; 4]> for FourCc {
    fn from(value: [u8; 4]) -> Self {
        Self(value)
    }
}

impl From<&[u8; 4]> for FourCc {
    fn from(value: &[u8; 4]) -> Self {
        Self(*value)
    }
}

impl PartialEq<[u8; 4]> for FourCc {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl core::fmt::Display for FourCc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for b in self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for FourCc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FourCc(\"{self}\")")
    }
}

/// The header in front of every chunk's data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkHeader {
    pub fourcc: FourCc,
    pub len: u32,
}

/// Parses out a chunk header.
///
/// The format is simple:
///
/// - let fourcc = input.read(4)
/// - let len = input.read_u32()
///
/// The data (and any padding byte) comes afterward. That's the walker's job.
pub fn chunk_header(input: &mut &[u8]) -> ModalResult<ChunkHeader, ContextError> {
    (fourcc, le_u32)
        .map(|(fourcc, len)| ChunkHeader { fourcc, len })
        .parse_next(input)
}

/// Grabs four bytes as a [`FourCc`].
pub fn fourcc<'i, E: ParserError<&'i [u8]>>(input: &mut &'i [u8]) -> Result<FourCc, E> {
    take(4_usize)
        .map(|s: &[u8]| FourCc([s[0], s[1], s[2], s[3]]))
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use winnow::error::EmptyError;

    use super::{ChunkHeader, FourCc, chunk_header, fourcc};

    #[test]
    fn parses_chunk_header() {
        let mut input: &[u8] = b"VP8L\x05\x00\x00\x00\x2f";

        assert_eq!(
            chunk_header(&mut input).unwrap(),
            ChunkHeader {
                fourcc: FourCc(*b"VP8L"),
                len: 5
            }
        );
        assert_eq!(input, [0x2f_u8]);
    }

    #[test]
    fn short_chunk_header_fails() {
        let mut input: &[u8] = b"VP8L\x05\x00";
        assert!(chunk_header(&mut input).is_err());

        let mut input: &[u8] = b"VP8";
        assert!(fourcc::<EmptyError>(&mut input).is_err());
    }

    #[test]
    fn display_escapes_unprintable_bytes() {
        assert_eq!(FourCc(*b"XMP ").to_string(), "XMP ");
        assert_eq!(FourCc(*b"a\0b\x7f").to_string(), "a\\x00b\\x7f");
        assert_eq!(format!("{:?}", FourCc(*b"VP8X")), "FourCc(\"VP8X\")");
    }
}
