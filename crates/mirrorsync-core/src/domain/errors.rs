//! Domain error types
//!
//! This module defines error types specific to domain operations:
//! validation failures for domain values and the classified filesystem
//! failures that a single file operation can produce.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid file name (not a single path component)
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}

/// A filesystem failure, classified by the kinds a sync pass cares about
///
/// `NotFound` covers both a source file that vanished before it could be
/// copied and a destination file that vanished before it could be deleted.
#[derive(Debug, Error)]
pub enum FsError {
    /// The path did not exist when the operation ran
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Insufficient filesystem permissions
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Any other read, write, or compare failure
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// The path the failing operation targeted
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Classifies an I/O error raised while operating on `path`
    pub fn from_io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(path),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source: err },
        }
    }

    /// The path the failing operation targeted
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(path) | Self::PermissionDenied(path) => path,
            Self::Io { path, .. } => path,
        }
    }

    /// Returns true if the target did not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if the operation was refused by the OS
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}
