use webp_metadata_types::{Directory, DirectoryKind};

/// The ordered list of directories extracted from one file.
///
/// Directories can only be appended. Whoever walks the file owns the
/// collector, and lends it out by `&mut` while chunks are processed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collector {
    directories: Vec<Directory>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directory: Directory) {
        log::trace!(
            "Collected a `{}` directory with `{}` tag(s) and `{}` error(s).",
            directory.kind(),
            directory.tag_count(),
            directory.errors().len()
        );
        self.directories.push(directory);
    }

    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Directory> {
        self.directories.iter()
    }

    pub fn as_slice(&self) -> &[Directory] {
        &self.directories
    }

    /// Finds the first directory of the given kind.
    pub fn first_of(&self, kind: DirectoryKind) -> Option<&Directory> {
        self.directories.iter().find(|d| d.kind() == kind)
    }

    /// Every directory of the given kind, in the order they were collected.
    pub fn all_of(&self, kind: DirectoryKind) -> impl Iterator<Item = &Directory> {
        self.directories.iter().filter(move |d| d.kind() == kind)
    }

    pub fn into_inner(self) -> Vec<Directory> {
        self.directories
    }
}

impl Extend<Directory> for Collector {
    fn extend<T: IntoIterator<Item = Directory>>(&mut self, iter: T) {
        for directory in iter {
            self.push(directory);
        }
    }
}

impl IntoIterator for Collector {
    type Item = Directory;
    type IntoIter = std::vec::IntoIter<Directory>;

    fn into_iter(self) -> Self::IntoIter {
        self.directories.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collector {
    type Item = &'a Directory;
    type IntoIter = core::slice::Iter<'a, Directory>;

    fn into_iter(self) -> Self::IntoIter {
        self.directories.iter()
    }
}
