//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`ILocalFileSystem`] - Directory listing, comparison, and per-file operations
//! - [`ILogSink`] - Destinations for rendered audit lines

pub mod local_filesystem;
pub mod log_sink;

pub use local_filesystem::ILocalFileSystem;
pub use log_sink::{ILogSink, LogWriteError};
