//! ActionPlan - set algebra over two directory snapshots
//!
//! Given a source and a destination snapshot the planner partitions every
//! observed name into exactly one of three sets:
//!
//! ```text
//! to_add    = source - destination
//! to_remove = destination - source
//! to_update = source ∩ destination   (candidates, confirmed by content compare)
//! ```
//!
//! The planner is pure: it never touches the filesystem.

use std::collections::BTreeSet;

use super::newtypes::FileName;
use super::snapshot::DirectorySnapshot;

/// The three disjoint name sets one pass acts on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionPlan {
    to_add: BTreeSet<FileName>,
    to_remove: BTreeSet<FileName>,
    to_update: BTreeSet<FileName>,
}

impl ActionPlan {
    /// Partitions the names of both snapshots
    pub fn new(source: &DirectorySnapshot, destination: &DirectorySnapshot) -> Self {
        let src = source.names();
        let dst = destination.names();

        Self {
            to_add: src.difference(dst).cloned().collect(),
            to_remove: dst.difference(src).cloned().collect(),
            to_update: src.intersection(dst).cloned().collect(),
        }
    }

    /// Names present only in the source
    pub fn to_add(&self) -> &BTreeSet<FileName> {
        &self.to_add
    }

    /// Names present only in the destination
    pub fn to_remove(&self) -> &BTreeSet<FileName> {
        &self.to_remove
    }

    /// Names present in both; each still needs a content comparison
    pub fn to_update(&self) -> &BTreeSet<FileName> {
        &self.to_update
    }

    /// Total number of names across the three sets
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len() + self.to_update.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `name` landed in any of the three sets
    pub fn covers(&self, name: &FileName) -> bool {
        self.to_add.contains(name) || self.to_remove.contains(name) || self.to_update.contains(name)
    }
}

/// Free-function form of [`ActionPlan::new`]
pub fn plan(source: &DirectorySnapshot, destination: &DirectorySnapshot) -> ActionPlan {
    ActionPlan::new(source, destination)
}
