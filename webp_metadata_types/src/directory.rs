//! Contains the [`Directory`], the unit of extracted metadata.

use rustc_hash::FxHashMap;

use crate::{TagValue, tags};

/// Says what a [`Directory`] describes, and which tag table applies to it.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum DirectoryKind {
    /// Image properties from the `VP8X`, `VP8L`, or `VP8 ` chunks.
    Webp,

    /// Exif's first IFD.
    #[doc(alias = "IFD0")]
    ExifIfd0,

    /// The Exif sub-IFD, pointed to by IFD 0.
    ExifSubIfd,

    /// The IFD following IFD 0, which describes an embedded thumbnail.
    #[doc(alias = "IFD1")]
    ExifThumbnail,

    /// The GPS IFD, pointed to by IFD 0.
    Gps,

    /// An ICC color profile header and its tag table.
    Icc,

    /// Properties from an XMP packet.
    Xmp,

    /// A container-level problem that isn't tied to any chunk.
    Error,
}

impl DirectoryKind {
    /// A human-readable name for this kind of directory.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Webp => "WebP",
            Self::ExifIfd0 => "Exif IFD0",
            Self::ExifSubIfd => "Exif SubIFD",
            Self::ExifThumbnail => "Exif Thumbnail",
            Self::Gps => "GPS",
            Self::Icc => "ICC Profile",
            Self::Xmp => "XMP",
            Self::Error => "Error",
        }
    }

    /// The table of display names for tags in this kind of directory.
    pub const fn tag_names(&self) -> &'static [(u32, &'static str)] {
        match self {
            Self::Webp => tags::webp::NAMES,
            Self::ExifIfd0 | Self::ExifSubIfd | Self::ExifThumbnail => tags::exif::NAMES,
            Self::Gps => tags::gps::NAMES,
            Self::Icc => tags::icc::NAMES,
            Self::Xmp => tags::xmp::NAMES,
            Self::Error => &[],
        }
    }
}

impl core::fmt::Display for DirectoryKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A named set of tags, plus any errors found while filling it in.
///
/// Decoders produce either a "clean" directory, with tags and no errors, or
/// an "errored" one, built with [`Directory::error`], which has no tags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directory {
    kind: DirectoryKind,
    tags: FxHashMap<u32, TagValue>,
    errors: Vec<String>,
}

impl Directory {
    /// Creates an empty directory.
    pub fn new(kind: DirectoryKind) -> Self {
        Self {
            kind,
            tags: FxHashMap::default(),
            errors: Vec::new(),
        }
    }

    /// Creates a directory holding nothing but an error message.
    pub fn error(kind: DirectoryKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            tags: FxHashMap::default(),
            errors: vec![message.into()],
        }
    }

    pub fn kind(&self) -> DirectoryKind {
        self.kind
    }

    /// Sets (or replaces) the value of a tag.
    pub fn set(&mut self, tag: u32, value: TagValue) {
        self.tags.insert(tag, value);
    }

    /// Builder-style [`Directory::set`].
    pub fn with(mut self, tag: u32, value: TagValue) -> Self {
        self.set(tag, value);
        self
    }

    pub fn get(&self, tag: u32) -> Option<&TagValue> {
        self.tags.get(&tag)
    }

    pub fn get_int(&self, tag: u32) -> Option<i64> {
        self.get(tag).and_then(TagValue::as_int)
    }

    pub fn get_bool(&self, tag: u32) -> Option<bool> {
        self.get(tag).and_then(TagValue::as_bool)
    }

    pub fn get_str(&self, tag: u32) -> Option<&str> {
        self.get(tag).and_then(TagValue::as_str)
    }

    pub fn contains(&self, tag: u32) -> bool {
        self.tags.contains_key(&tag)
    }

    /// All tags, sorted by identifier.
    pub fn tags(&self) -> Vec<(u32, &TagValue)> {
        let mut tags: Vec<(u32, &TagValue)> = self.tags.iter().map(|(k, v)| (*k, v)).collect();
        tags.sort_unstable_by_key(|(tag, _)| *tag);
        tags
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// The display name of `tag`, if this directory's kind knows it.
    pub fn tag_name(&self, tag: u32) -> Option<&'static str> {
        tags::lookup(self.kind.tag_names(), tag)
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether this directory has neither tags nor errors.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.errors.is_empty()
    }
}
