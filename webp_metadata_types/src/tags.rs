//! Tag identifiers, grouped by the kind of directory they appear in.
//!
//! These are generated from `tags.yaml` at build time. To add a tag, add an
//! entry to that file; the constant and its display name will show up here.
//!
//! ```
//! use webp_metadata_types::tags;
//!
//! assert_eq!(tags::webp::IMAGE_WIDTH, 2);
//! assert_eq!(tags::exif::MAKE, 0x010f);
//! ```

include!(concat!(env!("OUT_DIR"), "/tags.rs"));

/// Finds the display name for `tag` in one of the generated `NAMES` tables.
pub(crate) fn lookup(names: &[(u32, &'static str)], tag: u32) -> Option<&'static str> {
    names
        .binary_search_by_key(&tag, |(id, _)| *id)
        .ok()
        .map(|idx| names[idx].1)
}
