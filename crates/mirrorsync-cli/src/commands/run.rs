//! Run command - Mirror a directory periodically until stopped
//!
//! Provides the `mirrorsync run` CLI command which:
//! 1. Merges positional arguments over the configuration file
//! 2. Validates the result and creates the log directory
//! 3. Runs a pass every interval until SIGINT or SIGTERM
//! 4. Prints a summary of the whole session

use std::path::Path;

use anyhow::Result;
use clap::Args;
use mirrorsync_core::domain::ComparisonMode;
use mirrorsync_sync::{engine::SyncEngine, scheduler::PassScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::{load_config, merge_targets, prepare, TargetArgs};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Seconds to wait between passes
    pub interval: Option<u64>,

    /// Trust matching size and modification time instead of reading contents
    #[arg(long)]
    pub shallow: bool,
}

impl RunCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        let mut config = merge_targets(load_config(config_path)?, &self.targets);
        if let Some(interval) = self.interval {
            config.sync.interval_secs = interval;
        }
        if self.shallow {
            config.sync.comparison = ComparisonMode::Shallow;
        }
        prepare(&config)?;

        formatter.info(&format!(
            "Mirroring {} -> {} every {}s (log: {})",
            config.sync.source.display(),
            config.sync.destination.display(),
            config.sync.interval_secs,
            config.log_file_path().display()
        ));

        let engine = SyncEngine::from_config(&config);

        let shutdown = CancellationToken::new();
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            shutdown_signal(signal_token).await;
        });

        let stats = PassScheduler::from_config(&config, shutdown).run(&engine).await;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "passes": stats.passes,
                "failed_passes": stats.failed_passes,
                "actions": stats.actions,
                "file_errors": stats.file_errors,
            }));
        } else {
            formatter.success(&format!(
                "Stopped after {} pass{}",
                stats.passes,
                if stats.passes == 1 { "" } else { "es" }
            ));
            formatter.info(&format!("Actions:       {}", stats.actions));
            if stats.failed_passes > 0 {
                formatter.warn(&format!("Failed passes: {}", stats.failed_passes));
            }
            if stats.file_errors > 0 {
                formatter.warn(&format!("File errors:   {}", stats.file_errors));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Signal handling
// ============================================================================

/// Cancels `token` on SIGINT (Ctrl+C) or SIGTERM
///
/// If a handler cannot be installed, that signal is simply never observed.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}
