//! MirrorSync Sync - One-way directory synchronization engine
//!
//! Provides:
//! - Content comparison of same-named files
//! - Flat directory snapshots and per-file add/remove/update operations
//! - A stateless single-pass engine that converges destination onto source
//! - An interval scheduler that repeats passes until cancelled
//!
//! ## Modules
//!
//! - [`comparator`] - Byte-level (or shallow) file comparison
//! - [`filesystem`] - Local filesystem adapter implementing `ILocalFileSystem`
//! - [`engine`] - Single-pass synchronization
//! - [`scheduler`] - Sleep-between-passes loop with graceful cancellation

pub mod comparator;
pub mod engine;
pub mod filesystem;
pub mod scheduler;

use std::path::PathBuf;

use mirrorsync_audit::ReportError;
use mirrorsync_core::domain::{ActionKind, DomainError, FileName, FsError};
use thiserror::Error;

/// Errors that can occur during synchronization operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// A directory could not be listed; the pass cannot proceed
    #[error("Failed to list {}: {source}", dir.display())]
    Snapshot {
        dir: PathBuf,
        #[source]
        source: FsError,
    },

    /// A single file's add, remove, or update failed
    #[error("Failed to {kind} '{file_name}': {source}")]
    FileOperation {
        kind: ActionKind,
        file_name: FileName,
        #[source]
        source: FsError,
    },

    /// The operation succeeded but its audit line was not fully written
    #[error("Failed to report '{file_name}': {source}")]
    Report {
        file_name: FileName,
        #[source]
        source: ReportError,
    },

    /// A domain-level error propagated from mirrorsync-core
    #[error("Domain error: {0}")]
    DomainError(#[from] DomainError),
}

impl SyncError {
    /// The file this error concerns, if it concerns a single file
    pub fn file_name(&self) -> Option<&FileName> {
        match self {
            SyncError::FileOperation { file_name, .. } | SyncError::Report { file_name, .. } => {
                Some(file_name)
            }
            _ => None,
        }
    }

    fn fs_error(&self) -> Option<&FsError> {
        match self {
            SyncError::Snapshot { source, .. } | SyncError::FileOperation { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    /// Returns true if a file or directory vanished before it could be used
    pub fn is_not_found(&self) -> bool {
        self.fs_error().is_some_and(FsError::is_not_found)
    }

    /// Returns true if the OS refused the operation
    pub fn is_permission_denied(&self) -> bool {
        self.fs_error().is_some_and(FsError::is_permission_denied)
    }

    /// Returns true if only the audit trail failed
    pub fn is_log_write(&self) -> bool {
        matches!(self, SyncError::Report { .. })
    }
}
