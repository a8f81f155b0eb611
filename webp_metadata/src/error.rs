/// A read went past the end of the buffer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReadError {
    /// Asked for `len` bytes at `offset`, but the buffer is only `available`
    /// bytes long.
    OutOfBounds {
        offset: usize,
        len: usize,
        available: usize,
    },
}

impl core::fmt::Display for ReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds {
                offset,
                len,
                available,
            } => write!(
                f,
                "Attempted to read `{len}` byte(s) at offset `{offset}`, \
                but the buffer is only `{available}` byte(s) long."
            ),
        }
    }
}

impl core::error::Error for ReadError {}
