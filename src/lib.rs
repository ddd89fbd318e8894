//! otrace — trace reconstruction over OTCS integration log artifacts.
//!
//! The integration writes three kinds of artifacts: line-oriented application
//! logs, raw request/response dumps per outbound or inbound call, and map
//! files. None of them carry a correlation id reliably. otrace re-reads all of
//! them on every query and stitches them back into per-request traces.
//!
//! # Architecture
//!
//! ```text
//! DirectorySource ──► Snapshot ──► otrace-core pipeline ──► server / CLI
//! ```
//!
//! This crate holds the outer surfaces (HTTP API and plain-text rendering);
//! the pipeline lives in `otrace-core` and the filesystem access in
//! `otrace-sources`.

pub mod render;
pub mod server;

pub use otrace_core::{
    EntryKind, FilterOptions, LogAnalyzer, LogEntry, SearchFilters, Snapshot, Trace,
};
pub use otrace_sources::{DirectoryLayout, DirectorySource, StaticSource};
