//! Pass scheduler - repeats synchronization passes on a fixed interval
//!
//! The [`PassScheduler`] drives the engine in a loop:
//! run a pass, sleep, repeat. Passes never overlap because the next one
//! starts only after the previous one returned.
//!
//! ## Cancellation
//!
//! Cancelling the [`CancellationToken`] interrupts the sleep between
//! passes. A pass that is already running is allowed to finish.

use std::time::Duration;

use mirrorsync_core::config::Config;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::engine::SyncEngine;

// ============================================================================
// SchedulerStats
// ============================================================================

/// Totals accumulated over the scheduler's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Passes that were started
    pub passes: u64,
    /// Passes aborted because a directory could not be listed
    pub failed_passes: u64,
    /// Executed actions across all passes
    pub actions: u64,
    /// Per-file errors across all passes
    pub file_errors: u64,
}

// ============================================================================
// PassScheduler
// ============================================================================

/// Runs [`SyncEngine::run_one_pass`] every `interval` until cancelled
#[derive(Debug, Clone)]
pub struct PassScheduler {
    interval: Duration,
    shutdown: CancellationToken,
    max_passes: Option<u64>,
}

impl PassScheduler {
    pub fn new(interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            interval,
            shutdown,
            max_passes: None,
        }
    }

    /// Uses `sync.interval_secs` from `config`
    pub fn from_config(config: &Config, shutdown: CancellationToken) -> Self {
        Self::new(Duration::from_secs(config.sync.interval_secs), shutdown)
    }

    /// Stops after `max_passes` passes even if never cancelled
    #[must_use]
    pub fn with_max_passes(mut self, max_passes: u64) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Loops until the token is cancelled (or the pass limit is reached)
    ///
    /// A failed pass is logged and the schedule continues; the next pass
    /// starts from a fresh snapshot.
    pub async fn run(&self, engine: &SyncEngine) -> SchedulerStats {
        let mut stats = SchedulerStats::default();

        info!(
            interval_secs = self.interval.as_secs(),
            source = %engine.source().display(),
            destination = %engine.destination().display(),
            "Starting sync loop"
        );

        loop {
            if self.shutdown.is_cancelled() {
                info!("Shutdown requested before next pass");
                break;
            }

            stats.passes += 1;
            match engine.run_one_pass().await {
                Ok(report) => {
                    stats.actions += report.actions.len() as u64;
                    stats.file_errors += report.errors.len() as u64;
                    for err in &report.errors {
                        warn!(
                            pass_id = %report.pass_id,
                            error = %err,
                            "Pass finished with file error"
                        );
                    }
                }
                Err(e) => {
                    stats.failed_passes += 1;
                    error!(error = %e, "Sync pass failed");
                }
            }

            if self.max_passes.is_some_and(|max| stats.passes >= max) {
                info!(passes = stats.passes, "Pass limit reached");
                break;
            }

            // Wait for the next interval or shutdown
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!(
            passes = stats.passes,
            failed_passes = stats.failed_passes,
            actions = stats.actions,
            file_errors = stats.file_errors,
            "Sync loop terminated"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use mirrorsync_audit::{MemoryLogSink, SyncReporter};
    use tempfile::TempDir;

    use super::*;
    use crate::filesystem::LocalFileSystemAdapter;

    fn engine(src: PathBuf, dst: PathBuf) -> SyncEngine {
        SyncEngine::new(
            src,
            dst,
            Arc::new(LocalFileSystemAdapter::new()),
            SyncReporter::file_only(Arc::new(MemoryLogSink::new("memory"))),
        )
    }

    fn dirs(tmp: &TempDir) -> (PathBuf, PathBuf) {
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        std::fs::create_dir(&src).unwrap();
        std::fs::create_dir(&dst).unwrap();
        (src, dst)
    }

    #[tokio::test]
    async fn test_cancelled_before_start_runs_nothing() {
        let tmp = TempDir::new().unwrap();
        let (src, dst) = dirs(&tmp);
        std::fs::write(src.join("x.txt"), "hi").unwrap();

        let token = CancellationToken::new();
        token.cancel();

        let stats = PassScheduler::new(Duration::from_millis(1), token)
            .run(&engine(src, dst.clone()))
            .await;

        assert_eq!(stats, SchedulerStats::default());
        assert!(!dst.join("x.txt").exists());
    }

    #[tokio::test]
    async fn test_max_passes_limits_loop() {
        let tmp = TempDir::new().unwrap();
        let (src, dst) = dirs(&tmp);
        std::fs::write(src.join("x.txt"), "hi").unwrap();

        let stats = PassScheduler::new(Duration::from_millis(1), CancellationToken::new())
            .with_max_passes(3)
            .run(&engine(src, dst.clone()))
            .await;

        assert_eq!(stats.passes, 3);
        assert_eq!(stats.actions, 1);
        assert_eq!(stats.failed_passes, 0);
        assert!(dst.join("x.txt").exists());
    }

    #[tokio::test]
    async fn test_failed_pass_keeps_schedule() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        let dst = tmp.path().join("dst");
        std::fs::create_dir(&dst).unwrap();

        let stats = PassScheduler::new(Duration::from_millis(1), CancellationToken::new())
            .with_max_passes(2)
            .run(&engine(missing, dst))
            .await;

        assert_eq!(stats.passes, 2);
        assert_eq!(stats.failed_passes, 2);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_sleep() {
        let tmp = TempDir::new().unwrap();
        let (src, dst) = dirs(&tmp);

        let token = CancellationToken::new();
        let scheduler = PassScheduler::new(Duration::from_secs(3600), token.clone());
        let engine = engine(src, dst);

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        let stats = tokio::time::timeout(Duration::from_secs(10), scheduler.run(&engine))
            .await
            .unwrap();
        canceller.await.unwrap();

        assert_eq!(stats.passes, 1);
    }

    #[test]
    fn test_from_config_interval() {
        let mut config = Config::default();
        config.sync.interval_secs = 15;
        let scheduler = PassScheduler::from_config(&config, CancellationToken::new());
        assert_eq!(scheduler.interval(), Duration::from_secs(15));
    }
}
