//! DirectorySnapshot - the flat file set of one directory at one instant
//!
//! Snapshots are rebuilt from the filesystem at the start of every pass
//! and dropped when the pass ends. Nothing is cached between passes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::newtypes::FileName;

/// The set of file names observed in a directory
///
/// The names are held in an ordered set so that anything iterating a
/// snapshot (and the plans built from it) does so alphabetically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySnapshot {
    root: PathBuf,
    names: BTreeSet<FileName>,
}

impl DirectorySnapshot {
    /// Creates an empty snapshot of `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            names: BTreeSet::new(),
        }
    }

    /// Creates a snapshot of `root` holding the given names
    pub fn with_names(root: impl Into<PathBuf>, names: impl IntoIterator<Item = FileName>) -> Self {
        Self {
            root: root.into(),
            names: names.into_iter().collect(),
        }
    }

    /// Records a name; returns false if it was already present
    pub fn insert(&mut self, name: FileName) -> bool {
        self.names.insert(name)
    }

    /// The directory this snapshot was taken of
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn names(&self) -> &BTreeSet<FileName> {
        &self.names
    }

    pub fn contains(&self, name: &FileName) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Full path of `name` inside the snapshot root
    pub fn path_of(&self, name: &FileName) -> PathBuf {
        self.root.join(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileName> {
        self.names.iter()
    }
}
