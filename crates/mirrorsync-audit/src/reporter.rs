//! SyncReporter - one audit line per executed sync action
//!
//! Renders a [`LogEntry`] for each [`SyncAction`] and writes it to the
//! console sink (if any) and the log file sink. A failing sink never
//! undoes the file operation being reported: the caller gets a
//! [`ReportError`] that says which sink failed, and keeps going.

use std::sync::Arc;

use mirrorsync_core::{
    config::Config,
    domain::{LogEntry, SyncAction},
    ports::log_sink::{ILogSink, LogWriteError},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::sink::{ConsoleSink, FileLogSink};

/// A rendered line could not be delivered to every sink
#[derive(Debug, Error)]
pub enum ReportError {
    /// The console write failed; the log file write succeeded
    #[error("Console write failed: {0}")]
    Console(#[source] LogWriteError),

    /// The log file write failed
    #[error("Log file write failed: {0}")]
    LogFile(#[source] LogWriteError),
}

/// Writes audit lines for executed sync actions
#[derive(Clone)]
pub struct SyncReporter {
    console: Option<Arc<dyn ILogSink>>,
    log_file: Arc<dyn ILogSink>,
}

impl SyncReporter {
    /// Creates a reporter writing to both sinks
    pub fn new(console: Arc<dyn ILogSink>, log_file: Arc<dyn ILogSink>) -> Self {
        Self {
            console: Some(console),
            log_file,
        }
    }

    /// Creates a reporter that only writes to the log file
    pub fn file_only(log_file: Arc<dyn ILogSink>) -> Self {
        Self {
            console: None,
            log_file,
        }
    }

    /// Stdout plus `<logging.directory>/<logging.file_name>`, honoring
    /// `logging.console`
    pub fn from_config(config: &Config) -> Self {
        let log_file: Arc<dyn ILogSink> = Arc::new(FileLogSink::new(config.log_file_path()));
        if config.logging.console {
            Self::new(Arc::new(ConsoleSink::new()), log_file)
        } else {
            Self::file_only(log_file)
        }
    }

    /// Records `action`, returning the entry that was written
    ///
    /// Both sinks are always attempted. If the log file write fails, a
    /// notice is sent to the console on a best-effort basis.
    pub async fn report(&self, action: &SyncAction) -> Result<LogEntry, ReportError> {
        let entry = LogEntry::now(action);
        let line = entry.render();

        let console_result = match &self.console {
            Some(console) => console.write_line(&line).await,
            None => Ok(()),
        };
        if let Err(e) = &console_result {
            warn!(error = %e, file = %action.file_name, "Failed to write audit line to console");
        }

        if let Err(e) = self.log_file.write_line(&line).await {
            warn!(error = %e, file = %action.file_name, "Failed to append audit line to log file");
            self.notify_console(&format!("Could not record in {}: {line}", e.sink))
                .await;
            return Err(ReportError::LogFile(e));
        }

        debug!(kind = %action.kind, file = %action.file_name, "Sync action reported");

        console_result.map(|()| entry).map_err(ReportError::Console)
    }

    async fn notify_console(&self, message: &str) {
        if let Some(console) = &self.console {
            if let Err(e) = console.write_line(message).await {
                debug!(error = %e, "Console notice dropped");
            }
        }
    }
}
