//! File comparator
//!
//! Decides whether two same-named files hold identical content. Neither
//! file is ever opened for writing. A file that cannot be read is an
//! error, never "different": the engine must not replace a file it could
//! not judge.

use std::fs::Metadata;
use std::path::Path;

use mirrorsync_core::domain::{ComparisonMode, FsError};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, instrument};

/// Bytes read from each file per comparison step
const CHUNK_SIZE: usize = 64 * 1024;

/// Compares file pairs according to a [`ComparisonMode`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    mode: ComparisonMode,
}

impl Comparator {
    #[must_use]
    pub fn new(mode: ComparisonMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    /// Returns true iff `source` and `destination` are identical
    ///
    /// A size mismatch returns false without reading either file.
    ///
    /// # Errors
    /// Returns an [`FsError`] naming whichever file could not be read
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub async fn is_identical(&self, source: &Path, destination: &Path) -> Result<bool, FsError> {
        let src_meta = tokio::fs::metadata(source)
            .await
            .map_err(|e| FsError::from_io(source, e))?;
        let dst_meta = tokio::fs::metadata(destination)
            .await
            .map_err(|e| FsError::from_io(destination, e))?;

        if src_meta.len() != dst_meta.len() {
            debug!(
                source_size = src_meta.len(),
                destination_size = dst_meta.len(),
                "Size mismatch"
            );
            return Ok(false);
        }

        if self.mode == ComparisonMode::Shallow && same_signature(&src_meta, &dst_meta) {
            debug!("Signatures match, skipping content read");
            return Ok(true);
        }

        compare_contents(source, destination).await
    }
}

/// Content-mode comparison of two files
pub async fn is_identical(source: &Path, destination: &Path) -> Result<bool, FsError> {
    Comparator::default().is_identical(source, destination).await
}

/// Type, size and modification time all equal
fn same_signature(a: &Metadata, b: &Metadata) -> bool {
    if a.file_type() != b.file_type() || a.len() != b.len() {
        return false;
    }
    match (a.modified(), b.modified()) {
        (Ok(ma), Ok(mb)) => ma == mb,
        _ => false,
    }
}

async fn compare_contents(source: &Path, destination: &Path) -> Result<bool, FsError> {
    let mut src = File::open(source)
        .await
        .map_err(|e| FsError::from_io(source, e))?;
    let mut dst = File::open(destination)
        .await
        .map_err(|e| FsError::from_io(destination, e))?;

    let mut src_buf = vec![0u8; CHUNK_SIZE];
    let mut dst_buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n_src = read_chunk(&mut src, &mut src_buf)
            .await
            .map_err(|e| FsError::from_io(source, e))?;
        let n_dst = read_chunk(&mut dst, &mut dst_buf)
            .await
            .map_err(|e| FsError::from_io(destination, e))?;

        if n_src != n_dst || src_buf[..n_src] != dst_buf[..n_dst] {
            debug!("Content differs");
            return Ok(false);
        }
        if n_src == 0 {
            return Ok(true);
        }
    }
}

/// Fills `buf` unless EOF comes first; returns the number of bytes read
async fn read_chunk(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use tempfile::TempDir;

    use super::*;

    async fn write(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        tokio::fs::write(&path, content).await.unwrap();
        path
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        let file = std::fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(time).unwrap();
    }

    #[tokio::test]
    async fn test_identical_content() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a", b"same bytes").await;
        let b = write(&dir, "b", b"same bytes").await;
        assert!(is_identical(&a, &b).await.unwrap());
    }

    #[tokio::test]
    async fn test_different_size() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a", b"v1").await;
        let b = write(&dir, "b", b"v1 longer").await;
        assert!(!is_identical(&a, &b).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_size_different_content() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a", b"v1").await;
        let b = write(&dir, "b", b"v2").await;
        assert!(!is_identical(&a, &b).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_files_are_identical() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a", b"").await;
        let b = write(&dir, "b", b"").await;
        assert!(is_identical(&a, &b).await.unwrap());
    }

    #[tokio::test]
    async fn test_difference_beyond_first_chunk() {
        let dir = TempDir::new().unwrap();
        let mut left = vec![7u8; CHUNK_SIZE * 2 + 10];
        let a = write(&dir, "a", &left).await;
        left[CHUNK_SIZE + 3] = 8;
        let b = write(&dir, "b", &left).await;
        assert!(!is_identical(&a, &b).await.unwrap());
    }

    #[tokio::test]
    async fn test_large_identical_files() {
        let dir = TempDir::new().unwrap();
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        let a = write(&dir, "a", &data).await;
        let b = write(&dir, "b", &data).await;
        assert!(is_identical(&a, &b).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_file_is_error_not_false() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a", b"x").await;
        let missing = dir.path().join("missing");

        let err = is_identical(&a, &missing).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.path(), missing.as_path());
    }

    #[tokio::test]
    async fn test_comparison_does_not_modify_files() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a", b"left").await;
        let b = write(&dir, "b", b"rite").await;
        let before = tokio::fs::metadata(&b).await.unwrap().modified().unwrap();

        is_identical(&a, &b).await.unwrap();

        assert_eq!(tokio::fs::read(&a).await.unwrap(), b"left");
        assert_eq!(tokio::fs::read(&b).await.unwrap(), b"rite");
        let after = tokio::fs::metadata(&b).await.unwrap().modified().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_shallow_trusts_matching_signature() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a", b"aaaa").await;
        let b = write(&dir, "b", b"bbbb").await;
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_mtime(&a, stamp);
        set_mtime(&b, stamp);

        let shallow = Comparator::new(ComparisonMode::Shallow);
        assert!(shallow.is_identical(&a, &b).await.unwrap());

        let content = Comparator::new(ComparisonMode::Content);
        assert!(!content.is_identical(&a, &b).await.unwrap());
    }

    #[tokio::test]
    async fn test_shallow_falls_back_to_content_on_mtime_mismatch() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a", b"same").await;
        let b = write(&dir, "b", b"same").await;
        set_mtime(&a, SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));
        set_mtime(&b, SystemTime::UNIX_EPOCH + Duration::from_secs(2_000));

        let shallow = Comparator::new(ComparisonMode::Shallow);
        assert!(shallow.is_identical(&a, &b).await.unwrap());
        assert_eq!(shallow.mode(), ComparisonMode::Shallow);
    }
}
