//! Identity extraction — correlation ids, business objects, and the keyword
//! tables that classify entries.
//!
//! Every pattern is compiled once into a `static` and evaluated in a fixed
//! precedence order. The keyword tables are plain ordered slices so the
//! first-match-wins rule can be read (and tested) in one place.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::EntryKind;

/// Product-specific label in front of a `TraceLogID` token.
pub const TRACE_LOG_LABEL: &str = "OTCS";

const TOKEN: &str = r"[0-9a-f]{8}[-_][0-9a-f]{4}[-_][0-9a-f]{4}[-_][0-9a-f]{4}[-_][0-9a-f]{12}";

/// An 8-4-4-4-12 token anywhere in the text, glued to neighbours or not.
static DIRECT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?i){TOKEN}")).expect("direct trace id pattern must compile")
});

static LABELED_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i){}\.TraceLogID[:\s]*({TOKEN})",
        regex::escape(TRACE_LOG_LABEL)
    ))
    .expect("labeled trace id pattern must compile")
});

static BUSINESS_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(BUS\d{7})_(\d{6})").expect("business object pattern must compile")
});

// ---------------------------------------------------------------------------
// Correlation ids
// ---------------------------------------------------------------------------

/// Map an id onto its canonical key: hyphen separators, lowercase hex.
///
/// Idempotent, and the underscore variant of an id normalizes to the same key
/// as the hyphenated one.
pub fn normalize_trace_id(raw: &str) -> String {
    raw.replace('_', "-").to_ascii_lowercase()
}

/// Pull a correlation id out of free text.
///
/// The first embedded token wins; failing that, a token behind the
/// `OTCS.TraceLogID` label. The result is always normalized.
pub fn extract_trace_id(text: &str) -> Option<String> {
    DIRECT_ID_RE
        .find(text)
        .or_else(|| LABELED_ID_RE.captures(text).and_then(|caps| caps.get(1)))
        .map(|m| normalize_trace_id(m.as_str()))
}

/// True when `key` already has the canonical 8-4-4-4-12 shape.
pub fn is_trace_id_shaped(key: &str) -> bool {
    DIRECT_ID_RE
        .find(key)
        .is_some_and(|m| m.start() == 0 && m.end() == key.len())
}

// ---------------------------------------------------------------------------
// Business objects
// ---------------------------------------------------------------------------

/// A business object reference, `BUS<7 digits>` plus a 6-digit id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessObject {
    pub bo_type: String,
    pub bo_id: String,
}

pub fn extract_business_object(text: &str) -> Option<BusinessObject> {
    BUSINESS_OBJECT_RE.captures(text).map(|caps| BusinessObject {
        bo_type: caps[1].to_string(),
        bo_id: caps[2].to_string(),
    })
}

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

/// Operation labels inferred from log message text. No match leaves the
/// operation unset.
const MESSAGE_OPERATIONS: &[(&[&str], &str)] = &[
    (&["masterdata"], "MasterData"),
    (&["classification"], "Classification"),
    (&["workspace"], "Workspace"),
    (&["node"], "Node"),
    (&["authentication", "otcsticket"], "Authentication"),
];

/// Operation labels inferred from raw artifact file names.
const FILENAME_OPERATIONS: &[(&[&str], &str)] = &[
    (&["masterdata"], "MasterData"),
    (&["auth"], "Authentication"),
    (&["classification"], "Classification"),
    (&["workspace"], "Workspace"),
    (&["node", "child_node"], "Node"),
    (&["member"], "Member"),
    (&["search"], "Search"),
];

/// Fallback operation for artifact files that match no keyword.
pub const UNKNOWN_OPERATION: &str = "Unknown";

/// Kind rules over the lowercased message. The ERROR level check sits between
/// the `Response` and `RawArtifactNote` rules; see [`infer_kind`].
const REQUEST_KEYWORDS: &[&str] = &["request", "calling"];
const RESPONSE_KEYWORDS: &[&str] = &["response", "received"];
const ERROR_KEYWORDS: &[&str] = &["error", "exception"];
const RAW_NOTE_KEYWORDS: &[&str] = &["raw log saved"];
const AUTH_KEYWORDS: &[&str] = &["otcsticket", "authentication"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn first_label(haystack: &str, table: &[(&[&str], &'static str)]) -> Option<&'static str> {
    let lower = haystack.to_lowercase();
    table
        .iter()
        .find(|(keywords, _)| contains_any(&lower, keywords))
        .map(|(_, label)| *label)
}

/// Infer the operation from a log message.
pub fn message_operation(message: &str) -> Option<&'static str> {
    first_label(message, MESSAGE_OPERATIONS)
}

/// Infer the operation from an artifact file name, `Unknown` when nothing
/// matches.
pub fn filename_operation(file_name: &str) -> &'static str {
    first_label(file_name, FILENAME_OPERATIONS).unwrap_or(UNKNOWN_OPERATION)
}

/// Classify a parsed log line. First matching rule wins.
pub fn infer_kind(level: &str, message: &str) -> EntryKind {
    let lower = message.to_lowercase();
    if contains_any(&lower, REQUEST_KEYWORDS) {
        EntryKind::Request
    } else if contains_any(&lower, RESPONSE_KEYWORDS) {
        EntryKind::Response
    } else if contains_any(&lower, ERROR_KEYWORDS) || level.eq_ignore_ascii_case("error") {
        EntryKind::Error
    } else if contains_any(&lower, RAW_NOTE_KEYWORDS) {
        EntryKind::RawArtifactNote
    } else if contains_any(&lower, AUTH_KEYWORDS) {
        EntryKind::Authentication
    } else {
        EntryKind::General
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
