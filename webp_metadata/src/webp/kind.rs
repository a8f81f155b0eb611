use crate::riff::FourCc;

/// The chunks a WebP file may carry that we know how to read.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ChunkKind {
    /// `EXIF`: an Exif (TIFF) block.
    Exif,

    /// `ICCP`: an ICC color profile.
    Iccp,

    /// `XMP `: an XMP packet.
    Xmp,

    /// `VP8X`: the "extended" format's feature flags and canvas size.
    Vp8x,

    /// `VP8L`: a lossless bitstream.
    Vp8l,

    /// `VP8 `: a lossy bitstream.
    Vp8,

    /// Anything else, like `ALPH` or `ANMF`.
    Other(FourCc),
}

impl ChunkKind {
    pub const EXIF: FourCc = FourCc(*b"EXIF");
    pub const ICCP: FourCc = FourCc(*b"ICCP");
    pub const XMP: FourCc = FourCc(*b"XMP ");
    pub const VP8X: FourCc = FourCc(*b"VP8X");
    pub const VP8L: FourCc = FourCc(*b"VP8L");
    pub const VP8: FourCc = FourCc(*b"VP8 ");

    /// Whether this chunk gets routed anywhere.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<FourCc> for ChunkKind {
    fn from(code: FourCc) -> Self {
        match code {
            Self::EXIF => Self::Exif,
            Self::ICCP => Self::Iccp,
            Self::XMP => Self::Xmp,
            Self::VP8X => Self::Vp8x,
            Self::VP8L => Self::Vp8l,
            Self::VP8 => Self::Vp8,
            other => Self::Other(other),
        }
    }
}
