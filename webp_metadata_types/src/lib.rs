//! # `webp_metadata_types`
//!
//! Plain data types describing the metadata records that `webp_metadata`
//! extracts.
//!
//! Every record is a [`Directory`]: a kind, a map of tag identifiers to
//! [`TagValue`]s, and a list of errors. Tag identifiers for each kind live in
//! the [`tags`] module.

#![forbid(unsafe_code)]

pub mod directory;
pub mod tags;
pub mod value;

pub use directory::{Directory, DirectoryKind};
pub use value::{Rational, TagValue};
