//! Log sink port
//!
//! A sink receives fully rendered audit lines. How the physical target is
//! opened, buffered, or rotated is up to the adapter.

use async_trait::async_trait;
use thiserror::Error;

/// A line could not be written to a sink
#[derive(Debug, Error)]
#[error("Failed to write to {sink}: {source}")]
pub struct LogWriteError {
    /// Name of the sink that failed (e.g. `console`, or the log file path)
    pub sink: String,
    /// The underlying I/O error
    #[source]
    pub source: std::io::Error,
}

impl LogWriteError {
    pub fn new(sink: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            sink: sink.into(),
            source,
        }
    }
}

/// Destination for rendered audit lines
#[async_trait]
pub trait ILogSink: Send + Sync {
    /// Human-readable name used in error messages
    fn name(&self) -> &str;

    /// Writes `line` followed by a newline
    async fn write_line(&self, line: &str) -> Result<(), LogWriteError>;
}
