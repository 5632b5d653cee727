//! Log sink adapters
//!
//! - [`ConsoleSink`] writes to stdout
//! - [`FileLogSink`] appends to a file, opening it per line so an external
//!   rotation never leaves the sink holding a stale handle
//! - [`MemoryLogSink`] keeps lines in memory (tests, previews)

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use mirrorsync_core::ports::log_sink::{ILogSink, LogWriteError};
use tokio::io::AsyncWriteExt;
use tracing::debug;

// ============================================================================
// ConsoleSink
// ============================================================================

/// Writes audit lines to standard output
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ILogSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn write_line(&self, line: &str) -> Result<(), LogWriteError> {
        let mut stdout = tokio::io::stdout();
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        stdout
            .write_all(buf.as_bytes())
            .await
            .map_err(|e| LogWriteError::new(self.name(), e))?;
        stdout
            .flush()
            .await
            .map_err(|e| LogWriteError::new(self.name(), e))
    }
}

// ============================================================================
// FileLogSink
// ============================================================================

/// Appends audit lines to a UTF-8, newline-delimited file
///
/// The file is created if missing. Its parent directory is not.
#[derive(Debug, Clone)]
pub struct FileLogSink {
    path: PathBuf,
    name: String,
}

impl FileLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ILogSink for FileLogSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write_line(&self, line: &str) -> Result<(), LogWriteError> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| LogWriteError::new(&self.name, e))?;

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        file.write_all(buf.as_bytes())
            .await
            .map_err(|e| LogWriteError::new(&self.name, e))?;
        file.flush()
            .await
            .map_err(|e| LogWriteError::new(&self.name, e))?;

        debug!(path = %self.path.display(), bytes = buf.len(), "Audit line appended");
        Ok(())
    }
}

// ============================================================================
// MemoryLogSink
// ============================================================================

/// Collects audit lines in memory
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    name: String,
    lines: Mutex<Vec<String>>,
}

impl MemoryLogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ILogSink for MemoryLogSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write_line(&self, line: &str) -> Result<(), LogWriteError> {
        let mut lines = self.lines.lock().map_err(|_| {
            LogWriteError::new(
                &self.name,
                std::io::Error::new(std::io::ErrorKind::Other, "sink lock poisoned"),
            )
        })?;
        lines.push(line.to_string());
        Ok(())
    }
}
