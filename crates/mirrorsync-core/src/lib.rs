//! MirrorSync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `FileName`, `DirectorySnapshot`, `ActionPlan`, `SyncAction`, `LogEntry`
//! - **Action planner** - pure set algebra over two snapshots
//! - **Port definitions** - Traits for adapters: `ILocalFileSystem`, `ILogSink`
//! - **Configuration** - YAML-backed settings with validation
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.

pub mod config;
pub mod domain;
pub mod ports;
