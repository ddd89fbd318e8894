//! Core types for otrace-core.
//!
//! This module defines the data structures shared across every pipeline
//! stage: the [`LogEntry`] observed event and its [`EntryKind`], the assembled
//! [`Trace`], the [`SearchFilters`] query value, and the [`Snapshot`] of the
//! artifact root that every query starts from.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// One observed event: either a parsed log line or a synthetic entry standing
/// in for a raw request/response artifact.
///
/// Only the file-reference and business-object fields are written after
/// construction (back-fill from companion files); everything else is fixed
/// when the entry is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Millisecond-precision timestamp, server-local, no zone.
    pub timestamp: NaiveDateTime,
    /// Free-text severity token as written in the log (`INFO`, `ERROR`, …).
    pub level: String,
    /// Raw message text.
    pub message: String,
    /// Normalized correlation key, if one could be recovered.
    pub trace_id: Option<String>,
    pub operation: Option<String>,
    /// Business-object type, e.g. `BUS2038001`.
    pub bo_type: Option<String>,
    /// Business-object id, the 6-digit suffix of the BUS token.
    pub bo_id: Option<String>,
    /// Root-relative path of the associated request artifact.
    pub request_file: Option<String>,
    /// Root-relative path of the associated response artifact.
    pub response_file: Option<String>,
    /// Root-relative path of the map file annotating this entry's trace.
    pub map_file: Option<String>,
    pub kind: EntryKind,
}

impl LogEntry {
    /// A bare entry with no identifiers attached.
    pub fn new(
        timestamp: NaiveDateTime,
        level: impl Into<String>,
        message: impl Into<String>,
        kind: EntryKind,
    ) -> Self {
        Self {
            timestamp,
            level: level.into(),
            message: message.into(),
            trace_id: None,
            operation: None,
            bo_type: None,
            bo_id: None,
            request_file: None,
            response_file: None,
            map_file: None,
            kind,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == EntryKind::Error
    }
}

/// Classification of a [`LogEntry`], inferred once at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    General,
    Request,
    Response,
    Error,
    RawArtifactNote,
    Classification,
    Authentication,
    Node,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::General => write!(f, "General"),
            EntryKind::Request => write!(f, "Request"),
            EntryKind::Response => write!(f, "Response"),
            EntryKind::Error => write!(f, "Error"),
            EntryKind::RawArtifactNote => write!(f, "RawArtifactNote"),
            EntryKind::Classification => write!(f, "Classification"),
            EntryKind::Authentication => write!(f, "Authentication"),
            EntryKind::Node => write!(f, "Node"),
        }
    }
}

/// All entries sharing one correlation key, ordered by timestamp.
///
/// Built by [`crate::timeline::group_traces`]; a trace always has at least one
/// entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    pub trace_id: String,
    pub entries: Vec<LogEntry>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_ms: i64,
    pub bo_type: Option<String>,
    pub bo_id: Option<String>,
    pub operation: Option<String>,
    pub has_errors: bool,
}

impl Trace {
    /// `end_time - start_time`.
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }
}

/// A trace query. Every field is optional; `None` means no constraint on that
/// dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Case-insensitive substring matched against ids, business object,
    /// operation and every member message.
    pub search: Option<String>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub bo_type: Option<String>,
    pub bo_id: Option<String>,
    pub operation: Option<String>,
    pub has_errors: Option<bool>,
}

impl SearchFilters {
    pub fn has_time_range(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

/// Distinct values available for client-side filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub bo_types: Vec<String>,
    pub operations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A line-oriented log file, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub name: String,
    pub contents: String,
}

/// A raw or map artifact. Only its name and modification time matter; the
/// payload is never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub name: String,
    /// Path relative to the artifact root, `/`-separated.
    pub relative_path: String,
    pub modified: Option<NaiveDateTime>,
}

/// Which raw directory an artifact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Inbound => write!(f, "Inbound"),
            Direction::Outbound => write!(f, "Outbound"),
        }
    }
}

/// Read-only view of the artifact root taken at the start of a query.
///
/// Every query builds a fresh snapshot; nothing is cached between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub log_files: Vec<LogFile>,
    pub inbound: Vec<ArtifactFile>,
    pub outbound: Vec<ArtifactFile>,
    pub maps: Vec<ArtifactFile>,
}

impl Snapshot {
    /// Raw request/response listings, inbound first.
    pub fn raw_listings(&self) -> [(Direction, &[ArtifactFile]); 2] {
        [
            (Direction::Inbound, self.inbound.as_slice()),
            (Direction::Outbound, self.outbound.as_slice()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.log_files.is_empty()
            && self.inbound.is_empty()
            && self.outbound.is_empty()
            && self.maps.is_empty()
    }
}

/// Anything that can produce a [`Snapshot`] of the artifact root.
pub trait SnapshotSource: Send + Sync {
    fn snapshot(&self) -> impl std::future::Future<Output = Snapshot> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
