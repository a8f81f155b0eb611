//! # `webp_metadata`
//!
//! A library to pull metadata out of WebP files.
//!
//! WebP files are RIFF containers. This crate walks their chunks and turns
//! each interesting one into [`Directory`] records:
//!
//! - `VP8X`, `VP8L`, and `VP8 ` give the image's size (and, for `VP8X`,
//!   whether it has alpha or animation),
//! - `EXIF` is decoded as Exif, even when a JPEG-style `Exif\0\0` preamble
//!   sneaks in front of it,
//! - `ICCP` is decoded as an ICC color profile,
//! - and `XMP ` is decoded as an XMP packet.
//!
//! Problems with the file never panic. Instead, they show up as directories
//! carrying an error message, right alongside everything that did parse.
//!
//! ```
//! use webp_metadata::{DirectoryKind, read_metadata, tags};
//!
//! // a tiny (and quite empty) lossless WebP
//! let mut file = b"RIFF".to_vec();
//! file.extend(18_u32.to_le_bytes());
//! file.extend(b"WEBPVP8L");
//! file.extend(5_u32.to_le_bytes());
//! file.extend([0x2F, 0x03, 0xC0, 0x00, 0x00, 0x00]);
//!
//! let directories = read_metadata(&file).unwrap();
//! let webp = directories.first_of(DirectoryKind::Webp).unwrap();
//! assert_eq!(webp.get_int(tags::webp::IMAGE_WIDTH), Some(4));
//! ```
//!
//! ## License
//!
//! This project is dual-licensed under either the Apache License 2.0 or the MIT License at your option.

#![forbid(unsafe_code)]

pub use webp_metadata_types::{Directory, DirectoryKind, Rational, TagValue, tags};

pub use crate::{
    collector::Collector,
    embedded::{EmbeddedDecoder, EmbeddedDecoders},
    error::ReadError,
    riff::{FourCc, RiffError},
    webp::{read_metadata, read_metadata_with},
};

pub mod collector;
pub mod embedded;
pub mod error;
pub mod reader;
pub mod riff;
pub mod webp;

/// Internal utility methods.
pub(crate) mod util {
    /// Helper function to initialize the logger for testing.
    #[cfg(test)]
    pub fn logger() {
        _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::max())
            .format_file(true)
            .format_line_number(true)
            .try_init();
    }
}
