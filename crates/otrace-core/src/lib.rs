//! otrace-core — trace reconstruction over OTCS integration log artifacts.
//!
//! This crate exposes the pipeline stages as public modules, plus the shared
//! types used across all stages.
//!
//! # Architecture
//!
//! ```text
//! Snapshot ──► Parser ──────┐
//!    │                      ├──► Timeline ──► Query
//!    └──────► Correlator ───┘
//! ```
//!
//! Every query starts from a fresh [`Snapshot`] of the artifact root. Nothing
//! is cached between queries and no stage can fail: unreadable or malformed
//! input only means fewer entries.

pub mod analyzer;
pub mod config;
pub mod correlator;
pub mod identity;
pub mod parser;
pub mod query;
pub mod timeline;
pub mod types;

pub use analyzer::LogAnalyzer;
pub use types::{
    ArtifactFile, Direction, EntryKind, FilterOptions, LogEntry, LogFile, SearchFilters,
    Snapshot, SnapshotSource, Trace,
};
