use winnow::{Parser as _, binary::le_u32, error::EmptyError};

use super::{FourCc, chunk::fourcc, error::RiffError};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiffHeader {
    /// How many bytes follow this field, including the form type.
    pub size: u32,

    /// What kind of RIFF file this is, like `WEBP` or `WAVE`.
    pub form_type: FourCc,
}

/// Parses out the RIFF file header.
///
/// This should be the first thing in the file.
pub fn riff_header(input: &mut &[u8]) -> Result<RiffHeader, RiffError> {
    // first, we should ensure there's `RIFF` (in ASCII) at the beginning
    const RIFF: [u8; 4] = *b"RIFF";
    let magic: FourCc = fourcc(input).map_err(|_: EmptyError| RiffError::NoHeader)?;
    if magic != RIFF {
        log::debug!("Not a RIFF file. got magic: `{magic}`");
        return Err(RiffError::NotRiff { found: magic });
    }

    // then, we should have a u32
    let size: u32 = le_u32
        .parse_next(input)
        .map_err(|_: EmptyError| RiffError::NoHeader)?;

    // the size counts the form type, so it's got to hold at least that
    if size < 4 {
        log::error!("RIFF size was reported as `{size}` bytes. Cannot continue parsing...");
        return Err(RiffError::SizeTooSmall { size });
    }

    // now, grab the form type (`WEBP`, for us)
    let form_type: FourCc = fourcc(input).map_err(|_: EmptyError| RiffError::NoHeader)?;

    Ok(RiffHeader { size, form_type })
}
