//! Local filesystem adapter (secondary/driven adapter)
//!
//! Implements [`ILocalFileSystem`] using `tokio::fs` for async file operations.
//!
//! ## Design Decisions
//!
//! - **Flat snapshots**: Only entries that resolve to regular files are
//!   listed. Subdirectories, broken links, and names that are not valid
//!   UTF-8 are skipped and logged.
//! - **Copy preserves mtime**: After copying content (and permissions),
//!   the source modification time is applied to the copy. Failing to do
//!   so is logged, not returned.
//! - **Update is delete-then-copy**: The destination file does not exist
//!   between the delete and the copy. A reader can observe that gap.

use std::path::Path;

use async_trait::async_trait;
use mirrorsync_core::{
    domain::{ComparisonMode, DirectorySnapshot, FileName, FsError, UpdateOutcome},
    ports::local_filesystem::ILocalFileSystem,
};
use tracing::{debug, instrument, warn};

use crate::comparator::Comparator;

// ============================================================================
// LocalFileSystemAdapter struct
// ============================================================================

/// Adapter that bridges the [`ILocalFileSystem`] port to the real filesystem.
///
/// All paths come from the method arguments; the only state is the
/// comparison strategy used for update candidates.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystemAdapter {
    comparator: Comparator,
}

impl LocalFileSystemAdapter {
    /// Create an adapter that compares by content.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an adapter with the given comparison strategy.
    #[must_use]
    pub fn with_comparison(mode: ComparisonMode) -> Self {
        Self {
            comparator: Comparator::new(mode),
        }
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }
}

// ============================================================================
// Copy helpers
// ============================================================================

/// Copies `src` to `dst`, then carries over the modification time
async fn copy_preserving_mtime(src: &Path, dst: &Path) -> Result<u64, FsError> {
    let bytes = match tokio::fs::copy(src, dst).await {
        Ok(bytes) => bytes,
        Err(e) => return Err(classify_copy_error(src, dst, e).await),
    };

    preserve_mtime(src, dst).await;
    Ok(bytes)
}

/// Blames the source if it is gone, otherwise the destination
async fn classify_copy_error(src: &Path, dst: &Path, err: std::io::Error) -> FsError {
    if tokio::fs::metadata(src).await.is_err() {
        FsError::from_io(src, err)
    } else {
        FsError::from_io(dst, err)
    }
}

async fn preserve_mtime(src: &Path, dst: &Path) {
    let modified = match tokio::fs::metadata(src).await.and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(e) => {
            warn!(path = %src.display(), error = %e, "Cannot read source mtime");
            return;
        }
    };

    // Read-only handle: the copy carries the source permissions, which may
    // forbid writing, and setting times only requires ownership
    let dst_owned = dst.to_path_buf();
    let result = tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&dst_owned)?;
        file.set_modified(modified)
    })
    .await;

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(path = %dst.display(), error = %e, "Cannot preserve mtime"),
        Err(e) => warn!(path = %dst.display(), error = %e, "mtime task failed"),
    }
}

// ============================================================================
// ILocalFileSystem implementation
// ============================================================================

#[async_trait]
impl ILocalFileSystem for LocalFileSystemAdapter {
    #[instrument(skip(self), fields(dir = %dir.display()))]
    async fn snapshot(&self, dir: &Path) -> Result<DirectorySnapshot, FsError> {
        let mut snapshot = DirectorySnapshot::new(dir);
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| FsError::from_io(dir, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FsError::from_io(dir, e))?
        {
            let raw = entry.file_name();
            let Some(raw_name) = raw.to_str() else {
                warn!(name = ?raw, "Skipping entry with non UTF-8 name");
                continue;
            };

            let name = match FileName::new(raw_name) {
                Ok(name) => name,
                Err(e) => {
                    warn!(name = %raw_name, error = %e, "Skipping invalid entry name");
                    continue;
                }
            };

            // Follows symlinks: a link to a regular file counts as a file
            match tokio::fs::metadata(entry.path()).await {
                Ok(meta) if meta.is_file() => {
                    snapshot.insert(name);
                }
                Ok(_) => debug!(name = %name, "Skipping non-file entry"),
                Err(e) => warn!(name = %name, error = %e, "Skipping unreadable entry"),
            }
        }

        debug!(files = snapshot.len(), "Snapshot taken");
        Ok(snapshot)
    }

    async fn files_identical(&self, source: &Path, destination: &Path) -> Result<bool, FsError> {
        self.comparator.is_identical(source, destination).await
    }

    #[instrument(skip(self, src_dir, dest_dir), fields(file = %name))]
    async fn add_file(
        &self,
        name: &FileName,
        src_dir: &Path,
        dest_dir: &Path,
    ) -> Result<(), FsError> {
        let src = src_dir.join(name);
        let dst = dest_dir.join(name);

        let bytes = copy_preserving_mtime(&src, &dst).await?;
        debug!(bytes, "File copied");
        Ok(())
    }

    #[instrument(skip(self, dest_dir), fields(file = %name))]
    async fn remove_file(&self, name: &FileName, dest_dir: &Path) -> Result<(), FsError> {
        let dst = dest_dir.join(name);
        tokio::fs::remove_file(&dst)
            .await
            .map_err(|e| FsError::from_io(&dst, e))?;
        debug!("File removed");
        Ok(())
    }

    #[instrument(skip(self, src_dir, dest_dir), fields(file = %name))]
    async fn update_file(
        &self,
        name: &FileName,
        src_dir: &Path,
        dest_dir: &Path,
    ) -> Result<UpdateOutcome, FsError> {
        let src = src_dir.join(name);
        let dst = dest_dir.join(name);

        if self.comparator.is_identical(&src, &dst).await? {
            debug!("Contents match, nothing to update");
            return Ok(UpdateOutcome::Unchanged);
        }

        tokio::fs::remove_file(&dst)
            .await
            .map_err(|e| FsError::from_io(&dst, e))?;
        let bytes = copy_preserving_mtime(&src, &dst).await?;

        debug!(bytes, "File replaced");
        Ok(UpdateOutcome::Replaced)
    }
}

// ============================================================================
// Unit tests
// ============================================================================
