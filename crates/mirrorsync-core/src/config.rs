//! Configuration module for MirrorSync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//! The engine receives everything it needs from a [`Config`] at construction;
//! nothing is read from ambient or global state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::ComparisonMode;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for MirrorSync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Directory whose flat file set is mirrored.
    pub source: PathBuf,
    /// Directory made to match the source. Anything else in it is deleted.
    pub destination: PathBuf,
    /// Seconds to sleep between the end of one pass and the start of the next.
    pub interval_secs: u64,
    /// How update candidates are compared.
    pub comparison: ComparisonMode,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Diagnostic level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Directory holding the audit log file.
    pub directory: PathBuf,
    /// Name of the audit log file inside `directory`.
    pub file_name: String,
    /// Whether audit lines are also written to stdout.
    pub console: bool,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/mirrorsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("mirrorsync")
            .join("config.yaml")
    }

    /// Full path of the audit log file.
    pub fn log_file_path(&self) -> PathBuf {
        self.logging.directory.join(&self.logging.file_name)
    }
}

// ---------------------------------------------------------------------------
// Config::default()
// ---------------------------------------------------------------------------

// Config derives Default because all its fields implement Default.
// (clippy::derivable_impls)

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            interval_secs: 60,
            comparison: ComparisonMode::Content,
        }
    }
}

/// Default audit log file name.
pub const DEFAULT_LOG_FILE_NAME: &str = "sync_log.txt";

impl Default for LoggingConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("mirrorsync");
        Self {
            level: "info".to_string(),
            directory: data_dir,
            file_name: DEFAULT_LOG_FILE_NAME.to_string(),
            console: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.interval_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- sync ---
        validate_directory(&mut errors, "sync.source", &self.sync.source);
        validate_directory(&mut errors, "sync.destination", &self.sync.destination);

        if !self.sync.source.as_os_str().is_empty()
            && !self.sync.destination.as_os_str().is_empty()
            && same_directory(&self.sync.source, &self.sync.destination)
        {
            errors.push(ValidationError {
                field: "sync.destination".into(),
                message: "must differ from sync.source".into(),
            });
        }

        if self.sync.interval_secs == 0 {
            errors.push(ValidationError {
                field: "sync.interval_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }
        if self.logging.directory.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "logging.directory".into(),
                message: "must be set".into(),
            });
        } else {
            // A log file inside either mirrored directory changes it on every pass
            for (other, name) in [
                (&self.sync.source, "sync.source"),
                (&self.sync.destination, "sync.destination"),
            ] {
                if !other.as_os_str().is_empty()
                    && same_directory(&self.logging.directory, other)
                {
                    errors.push(ValidationError {
                        field: "logging.directory".into(),
                        message: format!("must differ from {name}"),
                    });
                }
            }
        }
        if self.logging.file_name.is_empty()
            || self.logging.file_name.contains(['/', '\\'])
        {
            errors.push(ValidationError {
                field: "logging.file_name".into(),
                message: format!(
                    "must be a plain file name, got '{}'",
                    self.logging.file_name
                ),
            });
        }

        errors
    }
}

fn validate_directory(errors: &mut Vec<ValidationError>, field: &str, dir: &Path) {
    if dir.as_os_str().is_empty() {
        errors.push(ValidationError {
            field: field.into(),
            message: "must be set".into(),
        });
    } else if !dir.is_dir() {
        errors.push(ValidationError {
            field: field.into(),
            message: format!("directory does not exist: {}", dir.display()),
        });
    }
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use mirrorsync_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .sync_source(PathBuf::from("/srv/reports"))
///     .sync_destination(PathBuf::from("/mnt/backup/reports"))
///     .sync_interval_secs(30)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder pre-populated with default values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Start from an existing configuration (e.g. one loaded from disk).
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    // --- sync ---

    pub fn sync_source(mut self, source: PathBuf) -> Self {
        self.config.sync.source = source;
        self
    }

    pub fn sync_destination(mut self, destination: PathBuf) -> Self {
        self.config.sync.destination = destination;
        self
    }

    pub fn sync_interval_secs(mut self, seconds: u64) -> Self {
        self.config.sync.interval_secs = seconds;
        self
    }

    pub fn sync_comparison(mut self, mode: ComparisonMode) -> Self {
        self.config.sync.comparison = mode;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_directory(mut self, directory: PathBuf) -> Self {
        self.config.logging.directory = directory;
        self
    }

    pub fn logging_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.config.logging.file_name = file_name.into();
        self
    }

    pub fn logging_console(mut self, console: bool) -> Self {
        self.config.logging.console = console;
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
