//! Query layer — trace search and filter-option vocabulary.
//!
//! Every function here starts from a [`Snapshot`] and rebuilds the entry list
//! from scratch via [`collect_entries`]. There is no cache; two queries against
//! the same snapshot do the same work twice.

use std::collections::BTreeSet;

use crate::correlator;
use crate::parser;
use crate::timeline;
use crate::types::{FilterOptions, LogEntry, SearchFilters, Snapshot, Trace};

/// The per-query entry list: parsed log lines, synthetic raw-artifact entries,
/// map annotations and file-name back-fill, in that order.
pub fn collect_entries(snapshot: &Snapshot) -> Vec<LogEntry> {
    let mut entries = parser::parse_files(&snapshot.log_files);
    entries.extend(correlator::correlate(snapshot));
    correlator::annotate_maps(&mut entries, &snapshot.maps);
    timeline::backfill_from_files(&mut entries);
    entries
}

/// Traces matching `filters`, in group discovery order.
///
/// The time range is applied to entries *before* grouping, so a trace that
/// straddles a bound is reported with only its in-range entries and its
/// start/end reflect that truncated view.
pub fn query_traces(snapshot: &Snapshot, filters: &SearchFilters) -> Vec<Trace> {
    let mut entries = collect_entries(snapshot);
    if filters.has_time_range() {
        entries.retain(|e| in_range(e, filters));
    }

    timeline::group_traces(entries)
        .into_iter()
        .filter(|trace| matches(trace, filters))
        .collect()
}

/// The trace with exactly this correlation key, if any entry carries it.
pub fn get_trace(snapshot: &Snapshot, trace_id: &str) -> Option<Trace> {
    let members: Vec<LogEntry> = collect_entries(snapshot)
        .into_iter()
        .filter(|e| e.trace_id.as_deref() == Some(trace_id))
        .collect();
    timeline::assemble(trace_id.to_string(), members)
}

/// Distinct, sorted business-object types and operations across all entries,
/// traced or not.
pub fn filter_options(snapshot: &Snapshot) -> FilterOptions {
    let mut bo_types = BTreeSet::new();
    let mut operations = BTreeSet::new();
    for entry in collect_entries(snapshot) {
        if let Some(bo_type) = entry.bo_type.filter(|v| !v.is_empty()) {
            bo_types.insert(bo_type);
        }
        if let Some(operation) = entry.operation.filter(|v| !v.is_empty()) {
            operations.insert(operation);
        }
    }
    FilterOptions {
        bo_types: bo_types.into_iter().collect(),
        operations: operations.into_iter().collect(),
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn in_range(entry: &LogEntry, filters: &SearchFilters) -> bool {
    filters.from.is_none_or(|from| entry.timestamp >= from)
        && filters.to.is_none_or(|to| entry.timestamp <= to)
}

/// Post-grouping predicates, all of which must hold. Unset fields pass.
pub fn matches(trace: &Trace, filters: &SearchFilters) -> bool {
    if let Some(needle) = filters
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        if !matches_search(trace, &needle.to_lowercase()) {
            return false;
        }
    }
    equals(&filters.bo_type, &trace.bo_type)
        && equals(&filters.bo_id, &trace.bo_id)
        && equals(&filters.operation, &trace.operation)
        && filters.has_errors.is_none_or(|want| trace.has_errors == want)
}

fn equals(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted {
        Some(wanted) => actual.as_deref() == Some(wanted.as_str()),
        None => true,
    }
}

fn matches_search(trace: &Trace, needle: &str) -> bool {
    let hit = |value: &str| value.to_lowercase().contains(needle);
    hit(&trace.trace_id)
        || trace.bo_type.as_deref().is_some_and(hit)
        || trace.bo_id.as_deref().is_some_and(hit)
        || trace.operation.as_deref().is_some_and(hit)
        || trace.entries.iter().any(|e| hit(&e.message))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
