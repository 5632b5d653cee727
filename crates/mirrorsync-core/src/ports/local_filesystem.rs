//! Local filesystem port (driven/secondary port)
//!
//! This module defines the interface the sync engine uses to observe and
//! mutate the two directories of a pass: flat listing, content
//! comparison, and the three per-file operations.
//!
//! ## Design Notes
//!
//! - Errors are returned as [`FsError`] so the engine can tell a vanished
//!   file from a permission problem without string matching.
//! - Every operation takes the enclosing directory explicitly; the
//!   adapter holds no paths of its own.
//! - No operation is atomic across files. A change made between
//!   `snapshot` and an operation is picked up by the next pass.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::{
    errors::FsError, newtypes::FileName, snapshot::DirectorySnapshot, UpdateOutcome,
};

// ============================================================================
// ILocalFileSystem trait
// ============================================================================

/// Port for the filesystem operations of one synchronization pass
#[async_trait]
pub trait ILocalFileSystem: Send + Sync {
    /// Lists the flat file set of `dir`
    ///
    /// # Errors
    /// Fails if the directory itself cannot be read
    async fn snapshot(&self, dir: &Path) -> Result<DirectorySnapshot, FsError>;

    /// Returns true iff the two files have identical content
    ///
    /// Must not mutate either file. An unreadable file is an error, never
    /// "not identical".
    async fn files_identical(&self, source: &Path, destination: &Path) -> Result<bool, FsError>;

    /// Copies `name` from `src_dir` into `dest_dir`
    async fn add_file(&self, name: &FileName, src_dir: &Path, dest_dir: &Path)
        -> Result<(), FsError>;

    /// Deletes `name` from `dest_dir`
    ///
    /// A file that is already absent is reported as `FsError::NotFound`.
    async fn remove_file(&self, name: &FileName, dest_dir: &Path) -> Result<(), FsError>;

    /// Replaces `dest_dir/name` with `src_dir/name` if their contents differ
    ///
    /// Replacement is delete-then-copy: the destination file is briefly
    /// absent while the copy runs.
    async fn update_file(
        &self,
        name: &FileName,
        src_dir: &Path,
        dest_dir: &Path,
    ) -> Result<UpdateOutcome, FsError>;
}
