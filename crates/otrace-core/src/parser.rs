//! Parser — turns line-oriented log files into [`LogEntry`] values.
//!
//! Grammar: `yyyy-MM-dd HH:mm:ss.fff [LEVEL] message`. Lines that do not match
//! are dropped without complaint; partial and corrupt lines are normal in a
//! file that is still being written.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::identity;
use crate::types::{LogEntry, LogFile};

/// `chrono` format of the leading timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3})\s+\[([^\]]+)\]\s?(.*)$")
        .expect("log line pattern must compile")
});

/// Parse one line. `None` when the line does not fit the grammar or the
/// timestamp is not a real instant.
pub fn parse_line(line: &str) -> Option<LogEntry> {
    let line = line.trim_end_matches(['\r', '\n']);
    let caps = LINE_RE.captures(line)?;
    let timestamp = NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT).ok()?;
    let level = caps[2].trim();
    let message = &caps[3];

    let mut entry = LogEntry::new(
        timestamp,
        level,
        message,
        identity::infer_kind(level, message),
    );
    entry.trace_id = identity::extract_trace_id(message);
    entry.operation = identity::message_operation(message).map(str::to_string);
    if let Some(bo) = identity::extract_business_object(message) {
        entry.bo_type = Some(bo.bo_type);
        entry.bo_id = Some(bo.bo_id);
    }
    Some(entry)
}

/// Parse every line of `contents`, keeping file order.
pub fn parse_contents(contents: &str) -> Vec<LogEntry> {
    contents.lines().filter_map(parse_line).collect()
}

/// Parse all log files of a snapshot, one after another.
pub fn parse_files(files: &[LogFile]) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    for file in files {
        let before = entries.len();
        entries.extend(parse_contents(&file.contents));
        let parsed = entries.len() - before;
        let skipped = file.contents.lines().count() - parsed;
        tracing::debug!(file = %file.name, parsed, skipped, "parser: log file done");
    }
    entries
}

/// Render a timestamp back into the log grammar.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
