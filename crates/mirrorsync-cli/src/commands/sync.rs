//! Sync command - Run exactly one pass
//!
//! Provides the `mirrorsync sync` CLI command which:
//! 1. Merges positional arguments over the configuration file
//! 2. Runs a single pass (or previews it with `--dry-run`)
//! 3. Displays what was done and fails if any file could not be synced

use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;
use mirrorsync_core::domain::{ActionKind, SyncAction};
use mirrorsync_sync::engine::{PassPreview, PassReport, SyncEngine};

use super::{check, load_config, merge_targets, prepare, TargetArgs};
use crate::output::{get_formatter, OutputFormat, OutputFormatter};

#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);

        let config = merge_targets(load_config(config_path)?, &self.targets);
        // A preview never creates the log directory
        if self.dry_run {
            check(&config)?;
        } else {
            prepare(&config)?;
        }
        let engine = SyncEngine::from_config(&config);

        if self.dry_run {
            let preview = engine.preview_pass().await?;
            show_preview(formatter.as_ref(), format, &preview);
            return Ok(());
        }

        let report = engine.run_one_pass().await?;
        show_report(formatter.as_ref(), format, &report);

        if report.has_errors() {
            bail!(
                "{} file{} could not be synchronized",
                report.errors.len(),
                plural(report.errors.len())
            );
        }
        Ok(())
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn show_preview(formatter: &dyn OutputFormatter, format: OutputFormat, preview: &PassPreview) {
    let actions = &preview.actions;
    if matches!(format, OutputFormat::Json) {
        let errors: Vec<String> = preview.errors.iter().map(|e| e.to_string()).collect();
        formatter.print_json(&serde_json::json!({
            "dry_run": true,
            "actions": actions,
            "errors": errors,
        }));
        return;
    }

    if actions.is_empty() && preview.errors.is_empty() {
        formatter.success("Dry run: already up to date");
        return;
    }

    formatter.success(&format!(
        "Dry run: {} action{} would be taken",
        actions.len(),
        plural(actions.len())
    ));
    for action in actions {
        formatter.info(&format!("{:<7} {}", action.kind.to_string(), action.file_name));
    }

    if !preview.errors.is_empty() {
        formatter.warn(&format!(
            "{} file{} could not be compared:",
            preview.errors.len(),
            plural(preview.errors.len())
        ));
        for err in &preview.errors {
            formatter.info(&format!("  - {err}"));
        }
    }
}

fn show_report(formatter: &dyn OutputFormatter, format: OutputFormat, report: &PassReport) {
    if matches!(format, OutputFormat::Json) {
        let errors: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        formatter.print_json(&serde_json::json!({
            "pass_id": report.pass_id.to_string(),
            "actions": report.actions,
            "unchanged": report.unchanged,
            "errors": errors,
            "duration_ms": report.duration_ms,
        }));
        return;
    }

    if report.is_clean() {
        formatter.success("Already up to date");
    } else {
        formatter.success(&format!("Pass completed in {}ms", report.duration_ms));
    }

    for (label, kind) in [
        ("Added:  ", ActionKind::Add),
        ("Removed:", ActionKind::Remove),
        ("Updated:", ActionKind::Update),
    ] {
        let count = report.count(kind);
        if count > 0 {
            formatter.info(&format!("{label} {count} file{}", plural(count)));
        }
    }

    if !report.errors.is_empty() {
        formatter.error(&format!(
            "{} error{} occurred:",
            report.errors.len(),
            plural(report.errors.len())
        ));
        for err in &report.errors {
            formatter.info(&format!("  - {err}"));
        }
    }
}
