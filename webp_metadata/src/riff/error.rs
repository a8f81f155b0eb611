use super::FourCc;

/// The input couldn't be walked as a RIFF container at all.
///
/// Problems found _inside_ the container are reported to the handler instead.
#[derive(Clone, Debug, PartialEq, PartialOrd, Hash)]
pub enum RiffError {
    /// The input ended before the 12-byte file header did.
    NoHeader,

    /// The file didn't start with `RIFF`.
    NotRiff { found: FourCc },

    /// The declared size can't even hold the form type.
    SizeTooSmall { size: u32 },
}

impl core::fmt::Display for RiffError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoHeader => f.write_str("The input is too short to hold a RIFF file header."),
            Self::NotRiff { found } => {
                write!(f, "Invalid RIFF header. Expected `RIFF`, but got: `{found}`")
            }
            Self::SizeTooSmall { size } => write!(
                f,
                "The RIFF header declared a size of `{size}` byte(s), which can't \
                hold the form type."
            ),
        }
    }
}

impl core::error::Error for RiffError {}
