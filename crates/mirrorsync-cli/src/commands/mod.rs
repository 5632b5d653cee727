//! CLI subcommands and the configuration merge they share

pub mod config;
pub mod run;
pub mod sync;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use mirrorsync_core::config::{Config, ConfigBuilder};
use tracing::{debug, info};

/// Directory arguments accepted by `run` and `sync`
///
/// Any value given here overrides the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// Source directory to mirror
    pub source: Option<PathBuf>,

    /// Destination directory (made identical to source)
    pub destination: Option<PathBuf>,

    /// Directory that receives sync_log.txt
    pub log_path: Option<PathBuf>,
}

/// Loads the configuration file if it exists, defaults otherwise
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let config = Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        info!(config_path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        debug!(config_path = %path.display(), "No configuration file, using defaults");
        Ok(Config::default())
    }
}

/// Applies command-line overrides on top of `config`
pub fn merge_targets(config: Config, targets: &TargetArgs) -> Config {
    let mut builder = ConfigBuilder::from_config(config);
    if let Some(source) = &targets.source {
        builder = builder.sync_source(source.clone());
    }
    if let Some(destination) = &targets.destination {
        builder = builder.sync_destination(destination.clone());
    }
    if let Some(log_path) = &targets.log_path {
        builder = builder.logging_directory(log_path.clone());
    }
    builder.build()
}

/// Creates the log directory, then validates the whole configuration
///
/// # Errors
/// Fails with every validation problem listed, one per line.
pub fn prepare(config: &Config) -> Result<()> {
    if !config.logging.directory.as_os_str().is_empty() {
        std::fs::create_dir_all(&config.logging.directory).with_context(|| {
            format!(
                "Failed to create log directory {}",
                config.logging.directory.display()
            )
        })?;
    }
    check(config)
}

/// Validates the configuration without touching the filesystem
///
/// # Errors
/// Fails with every validation problem listed, one per line.
pub fn check(config: &Config) -> Result<()> {
    let errors = config.validate();
    if !errors.is_empty() {
        let details: Vec<String> = errors.iter().map(|e| format!("  {e}")).collect();
        bail!("Invalid configuration:\n{}", details.join("\n"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_config_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.sync.interval_secs, 60);
    }

    #[test]
    fn test_load_config_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "sync: 42").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_merge_targets_overrides_only_given_values() {
        let config = ConfigBuilder::new()
            .sync_source(PathBuf::from("/from/file"))
            .sync_destination(PathBuf::from("/to/file"))
            .build();
        let targets = TargetArgs {
            source: Some(PathBuf::from("/from/cli")),
            destination: None,
            log_path: Some(PathBuf::from("/logs")),
        };

        let merged = merge_targets(config, &targets);
        assert_eq!(merged.sync.source, PathBuf::from("/from/cli"));
        assert_eq!(merged.sync.destination, PathBuf::from("/to/file"));
        assert_eq!(merged.logging.directory, PathBuf::from("/logs"));
    }

    #[test]
    fn test_prepare_creates_log_directory() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        std::fs::create_dir(&src).unwrap();
        std::fs::create_dir(&dst).unwrap();
        let logs = dir.path().join("logs").join("nested");

        let config = ConfigBuilder::new()
            .sync_source(src)
            .sync_destination(dst)
            .logging_directory(logs.clone())
            .build();

        prepare(&config).unwrap();
        assert!(logs.is_dir());
    }

    #[test]
    fn test_prepare_reports_missing_source() {
        let dir = TempDir::new().unwrap();
        let config = ConfigBuilder::new()
            .sync_destination(dir.path().to_path_buf())
            .logging_directory(dir.path().join("logs"))
            .build();

        let err = prepare(&config).unwrap_err();
        assert!(err.to_string().contains("sync.source: must be set"));
    }

    #[test]
    fn test_check_leaves_log_directory_alone() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        std::fs::create_dir(&src).unwrap();
        std::fs::create_dir(&dst).unwrap();
        let logs = dir.path().join("logs");

        let config = ConfigBuilder::new()
            .sync_source(src)
            .sync_destination(dst)
            .logging_directory(logs.clone())
            .build();

        check(&config).unwrap();
        assert!(!logs.exists());
    }

    #[test]
    fn test_prepare_rejects_log_directory_equal_to_destination() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        std::fs::create_dir(&src).unwrap();
        std::fs::create_dir(&dst).unwrap();

        let config = ConfigBuilder::new()
            .sync_source(src)
            .sync_destination(dst.clone())
            .logging_directory(dst)
            .build();

        let err = prepare(&config).unwrap_err();
        assert!(err
            .to_string()
            .contains("logging.directory: must differ from sync.destination"));
    }
}
