//! MirrorSync Audit - Audit trail for executed sync actions
//!
//! Provides:
//! - `SyncReporter`: Renders one line per executed action and writes it
//!   to the console and the append-only log file
//! - Log sinks: `ConsoleSink`, `FileLogSink`, and the in-memory `MemoryLogSink`

pub mod reporter;
pub mod sink;

pub use reporter::{ReportError, SyncReporter};
pub use sink::{ConsoleSink, FileLogSink, MemoryLogSink};
