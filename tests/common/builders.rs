//! Test builders — ergonomic constructors for `LogEntry` and `Snapshot`.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::NaiveDateTime;
use otrace_core::{ArtifactFile, EntryKind, LogEntry, LogFile, Snapshot};

/// Parse `yyyy-MM-dd HH:mm:ss[.fff]`.
pub fn ts(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .unwrap_or_else(|_| panic!("bad test timestamp: {text}"))
}

// ---------------------------------------------------------------------------
// LogEntryBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`LogEntry`] test fixtures.
///
/// # Example
///
/// ```rust
/// let entry = LogEntryBuilder::new("Calling masterdata")
///     .at("2025-01-01 12:00:00.000")
///     .trace(TRACE_A)
///     .kind(EntryKind::Request)
///     .build();
/// ```
pub struct LogEntryBuilder {
    entry: LogEntry,
}

impl LogEntryBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            entry: LogEntry::new(
                ts("2025-01-01 12:00:00.000"),
                "INFO",
                message,
                EntryKind::General,
            ),
        }
    }

    pub fn at(mut self, timestamp: &str) -> Self {
        self.entry.timestamp = ts(timestamp);
        self
    }

    pub fn level(mut self, level: &str) -> Self {
        self.entry.level = level.to_string();
        self
    }

    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.entry.kind = kind;
        self
    }

    pub fn trace(mut self, trace_id: &str) -> Self {
        self.entry.trace_id = Some(trace_id.to_string());
        self
    }

    pub fn operation(mut self, operation: &str) -> Self {
        self.entry.operation = Some(operation.to_string());
        self
    }

    pub fn business_object(mut self, bo_type: &str, bo_id: &str) -> Self {
        self.entry.bo_type = Some(bo_type.to_string());
        self.entry.bo_id = Some(bo_id.to_string());
        self
    }

    pub fn build(self) -> LogEntry {
        self.entry
    }
}

// ---------------------------------------------------------------------------
// SnapshotBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for an in-memory [`Snapshot`] using the default layout.
#[derive(Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(mut self, name: &str, lines: &[&str]) -> Self {
        let mut contents = lines.join("\n");
        contents.push('\n');
        self.snapshot.log_files.push(LogFile {
            name: name.to_string(),
            contents,
        });
        self
    }

    pub fn inbound(mut self, name: &str) -> Self {
        self.snapshot.inbound.push(artifact("Raw/Inbound", name));
        self
    }

    pub fn outbound(mut self, name: &str) -> Self {
        self.snapshot.outbound.push(artifact("Raw/Outbound", name));
        self
    }

    pub fn map(mut self, name: &str) -> Self {
        self.snapshot.maps.push(artifact("Raw/Maps", name));
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

fn artifact(dir: &str, name: &str) -> ArtifactFile {
    ArtifactFile {
        name: name.to_string(),
        relative_path: format!("{dir}/{name}"),
        modified: None,
    }
}
