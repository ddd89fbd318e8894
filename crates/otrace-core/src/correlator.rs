//! Raw-artifact correlation.
//!
//! Every raw request/response dump is named
//! `<yyyyMMddHHmmss>_<...>_<suffix>.txt`. The suffix is either a real
//! correlation token or carries the `NoTrace` marker for calls that never got
//! one. Correlation runs in two phases:
//!
//! 1. derive a [`KeyPattern`] per file across both raw directories and keep
//!    the distinct keys in discovery order;
//! 2. re-scan both directories once per key and emit one synthetic
//!    [`LogEntry`] per matching file.
//!
//! Map files never produce entries; [`annotate_maps`] only stamps their path
//! onto entries that already exist.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::identity;
use crate::types::{ArtifactFile, Direction, EntryKind, LogEntry, Snapshot};

/// Marker for calls that never acquired a correlation id.
pub const NO_TRACE: &str = "NoTrace";

const ARTIFACT_EXTENSION: &str = ".txt";
const MAP_PREFIX: &str = "Map_";
const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// A long alphanumeric run right after the last `_`.
static REAL_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_([A-Za-z0-9]{20,})$").expect("real suffix pattern must compile")
});

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// How a correlation key selects its files during the second pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPattern {
    /// A genuine id: either a normalized 8-4-4-4-12 token or the trailing
    /// alphanumeric suffix.
    Exact(String),
    /// Synthesized key for an untraceable call: capture timestamp plus the
    /// last name segment after the marker, if there is one.
    NoTrace {
        timestamp: String,
        tail: Option<String>,
    },
}

impl KeyPattern {
    /// The correlation key entries are grouped under.
    pub fn key(&self) -> String {
        match self {
            KeyPattern::Exact(key) => key.clone(),
            KeyPattern::NoTrace { timestamp, tail: Some(tail) } => {
                format!("{NO_TRACE}_{timestamp}_{tail}")
            }
            KeyPattern::NoTrace { timestamp, tail: None } => format!("{NO_TRACE}_{timestamp}"),
        }
    }

    /// Whether `file_name` belongs to this key, i.e. derives to exactly this
    /// pattern.
    ///
    /// For `NoTrace` keys this behaves like the glob
    /// `<timestamp>_*NoTrace*<tail>.txt` with the tail read the same way
    /// [`derive_key`] reads it, so every keyed file matches its own key.
    pub fn matches(&self, file_name: &str) -> bool {
        derive_key(file_name).is_some_and(|pattern| pattern == *self)
    }
}

/// File name without its `.txt` extension (any case).
fn artifact_stem(file_name: &str) -> Option<&str> {
    let split = file_name.len().checked_sub(ARTIFACT_EXTENSION.len())?;
    let extension = file_name.get(split..)?;
    extension
        .eq_ignore_ascii_case(ARTIFACT_EXTENSION)
        .then(|| &file_name[..split])
}

fn real_key(stem: &str) -> Option<String> {
    identity::extract_trace_id(stem).or_else(|| {
        REAL_SUFFIX_RE
            .captures(stem)
            .map(|caps| caps[1].to_string())
    })
}

/// Parse the 14-digit `yyyyMMddHHmmss` prefix of an artifact name.
pub fn filename_timestamp(file_name: &str) -> Option<NaiveDateTime> {
    let prefix = file_name.get(..14)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(prefix, FILENAME_TIMESTAMP_FORMAT).ok()
}

/// The per-call tail of a NoTrace name: the last `_` segment after the
/// marker, without leading `-`. `NoTrace_abc`, `NoTrace-abc` and `NoTraceabc`
/// all read as `abc`.
fn no_trace_tail(after_marker: &str) -> Option<String> {
    let segment = after_marker
        .rsplit_once('_')
        .map_or(after_marker, |(_, tail)| tail);
    Some(segment.trim_start_matches('-'))
        .filter(|tail| !tail.is_empty())
        .map(str::to_string)
}

/// Request/response classification of an artifact name. A `_`-separated
/// segment starting with `request` (or `response`) marks the file, so
/// `_request_` and numbered variants such as `_requestA_` both count.
fn artifact_kind(file_name: &str) -> (EntryKind, &'static str) {
    let lower = file_name.to_lowercase();
    let segments: Vec<&str> = lower.split('_').collect();
    // The first and last segments are the timestamp and the key.
    let inner = segments.get(1..segments.len().saturating_sub(1)).unwrap_or_default();
    if inner.iter().any(|s| s.starts_with("request")) {
        (EntryKind::Request, "request")
    } else if inner.iter().any(|s| s.starts_with("response")) {
        (EntryKind::Response, "response")
    } else {
        (EntryKind::RawArtifactNote, "artifact")
    }
}

/// Derive the correlation key of one raw artifact.
///
/// `None` drops the file from correlation: not a `.txt`, a `NoTrace` name
/// whose timestamp prefix does not parse, or a real name without an id token
/// and with a suffix shorter than 20 characters.
pub fn derive_key(file_name: &str) -> Option<KeyPattern> {
    let stem = artifact_stem(file_name)?;

    if let Some(marker) = stem.rfind(NO_TRACE) {
        filename_timestamp(stem)?;
        return Some(KeyPattern::NoTrace {
            timestamp: stem[..14].to_string(),
            tail: no_trace_tail(&stem[marker + NO_TRACE.len()..]),
        });
    }

    real_key(stem).map(KeyPattern::Exact)
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Produce one synthetic entry per raw artifact that has a key.
pub fn correlate(snapshot: &Snapshot) -> Vec<LogEntry> {
    let listings = snapshot.raw_listings();

    // Phase one: distinct keys, discovery order.
    let mut seen = HashSet::new();
    let mut patterns = Vec::new();
    let mut dropped = 0usize;
    for (_, files) in &listings {
        for file in files.iter() {
            match derive_key(&file.name) {
                Some(pattern) => {
                    if seen.insert(pattern.key()) {
                        patterns.push(pattern);
                    }
                }
                None => dropped += 1,
            }
        }
    }

    // Phase two: re-scan per key.
    let mut entries = Vec::new();
    for pattern in &patterns {
        let key = pattern.key();
        for (direction, files) in &listings {
            for file in files.iter().filter(|f| pattern.matches(&f.name)) {
                entries.push(artifact_entry(*direction, file, &key));
            }
        }
    }

    tracing::debug!(
        keys = patterns.len(),
        entries = entries.len(),
        dropped,
        "correlator: raw artifacts correlated"
    );
    entries
}

fn artifact_entry(direction: Direction, file: &ArtifactFile, key: &str) -> LogEntry {
    let timestamp = filename_timestamp(&file.name)
        .or(file.modified)
        .unwrap_or_default();

    let (kind, what) = artifact_kind(&file.name);

    let mut entry = LogEntry::new(
        timestamp,
        "INFO",
        format!("{direction} {what} found: {}", file.name),
        kind,
    );
    entry.trace_id = Some(key.to_string());
    entry.operation = Some(identity::filename_operation(&file.name).to_string());
    match kind {
        EntryKind::Response => entry.response_file = Some(file.relative_path.clone()),
        _ => entry.request_file = Some(file.relative_path.clone()),
    }
    if let Some(bo) = identity::extract_business_object(&file.name) {
        entry.bo_type = Some(bo.bo_type);
        entry.bo_id = Some(bo.bo_id);
    }
    entry
}

// ---------------------------------------------------------------------------
// Map files
// ---------------------------------------------------------------------------

/// Which entries a map file annotates.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MapTarget {
    Exact(String),
    /// `NoTrace_<timestamp>`, matched as a substring of the entry's id.
    NoTrace(String),
}

fn map_target(file_name: &str) -> Option<MapTarget> {
    let key = artifact_stem(file_name)?.strip_prefix(MAP_PREFIX)?;
    if key.is_empty() {
        return None;
    }

    if let Some(rest) = key.strip_prefix(NO_TRACE).and_then(|r| r.strip_prefix('_')) {
        let timestamp = rest.split('_').next().unwrap_or_default();
        if timestamp.is_empty() {
            return None;
        }
        return Some(MapTarget::NoTrace(format!("{NO_TRACE}_{timestamp}")));
    }

    let normalized = identity::normalize_trace_id(key);
    if identity::is_trace_id_shaped(&normalized) {
        Some(MapTarget::Exact(normalized))
    } else {
        Some(MapTarget::Exact(key.to_string()))
    }
}

/// Stamp each map file's path onto the entries sharing its key.
///
/// A map file with no matching entries is a no-op.
pub fn annotate_maps(entries: &mut [LogEntry], maps: &[ArtifactFile]) {
    for map in maps {
        let Some(target) = map_target(&map.name) else {
            tracing::debug!(file = %map.name, "correlator: not a map file name, skipped");
            continue;
        };

        let mut annotated = 0usize;
        for entry in entries.iter_mut() {
            let Some(id) = entry.trace_id.as_deref() else {
                continue;
            };
            let hit = match &target {
                MapTarget::Exact(key) => id == key,
                MapTarget::NoTrace(needle) => id.contains(needle.as_str()),
            };
            if hit {
                entry.map_file = Some(map.relative_path.clone());
                annotated += 1;
            }
        }
        tracing::debug!(file = %map.name, annotated, "correlator: map file applied");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
