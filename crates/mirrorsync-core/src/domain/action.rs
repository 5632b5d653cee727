//! Sync actions and the log entries rendered from them
//!
//! A [`SyncAction`] is produced only for a mutation that actually ran on
//! the destination. An update candidate whose content already matched
//! produces no action and therefore no [`LogEntry`].

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::newtypes::FileName;

/// Timestamp layout of a rendered log line (local time, whole seconds)
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The kind of mutation applied to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// File copied from source into destination
    Add,
    /// File deleted from destination
    Remove,
    /// Destination file replaced with the source version
    Update,
}

impl ActionKind {
    /// The verb phrase used in the audit line
    pub fn verb(&self) -> &'static str {
        match self {
            ActionKind::Add => "added to",
            ActionKind::Remove => "removed from",
            ActionKind::Update => "updated in",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActionKind::Add => "add",
            ActionKind::Remove => "remove",
            ActionKind::Update => "update",
        };
        write!(f, "{}", s)
    }
}

/// A single executed mutation on the destination
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyncAction {
    pub kind: ActionKind,
    pub file_name: FileName,
}

impl SyncAction {
    pub fn new(kind: ActionKind, file_name: FileName) -> Self {
        Self { kind, file_name }
    }

    pub fn add(file_name: FileName) -> Self {
        Self::new(ActionKind::Add, file_name)
    }

    pub fn remove(file_name: FileName) -> Self {
        Self::new(ActionKind::Remove, file_name)
    }

    pub fn update(file_name: FileName) -> Self {
        Self::new(ActionKind::Update, file_name)
    }
}

/// Result of applying an update to a candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Contents differed; destination was deleted and re-copied
    Replaced,
    /// Contents already matched; nothing was touched
    Unchanged,
}

/// One audit line describing a [`SyncAction`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub file_name: FileName,
    pub kind: ActionKind,
}

impl LogEntry {
    /// Creates an entry for `action` stamped with the current local time
    pub fn now(action: &SyncAction) -> Self {
        Self::at(Local::now(), action)
    }

    pub fn at(timestamp: DateTime<Local>, action: &SyncAction) -> Self {
        Self {
            timestamp,
            file_name: action.file_name.clone(),
            kind: action.kind,
        }
    }

    /// Renders the entry as a single line without a trailing newline
    ///
    /// `2024-05-01 12:00:00 File a.txt has been added to source folder, destination folder has been synchronized.`
    pub fn render(&self) -> String {
        format!(
            "{} File {} has been {} source folder, destination folder has been synchronized.",
            self.timestamp.format(LOG_TIMESTAMP_FORMAT),
            self.file_name,
            self.kind.verb()
        )
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
