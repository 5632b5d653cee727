//! Domain entities and business logic
//!
//! This module contains the core domain types for MirrorSync:
//! - Newtypes for validated file names and pass identifiers
//! - Directory snapshots and the action planner
//! - Sync actions and the audit lines rendered from them
//! - Domain-specific error types

pub mod action;
pub mod comparison;
pub mod errors;
pub mod newtypes;
pub mod plan;
pub mod snapshot;

// Re-export commonly used types
pub use action::{ActionKind, LogEntry, SyncAction, UpdateOutcome};
pub use comparison::ComparisonMode;
pub use errors::{DomainError, FsError};
pub use newtypes::*;
pub use plan::{plan, ActionPlan};
pub use snapshot::DirectorySnapshot;
