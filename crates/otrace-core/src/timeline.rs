//! Timeline assembly — groups entries by correlation key into [`Trace`]s.

use std::collections::HashMap;

use crate::identity;
use crate::types::{LogEntry, Trace};

/// Repair entries whose originating scan carried no business object in the
/// message but do point at a request file: the file name often does.
///
/// The operation is only replaced when it is missing or `Unknown` and the
/// file name actually names one.
pub fn backfill_from_files(entries: &mut [LogEntry]) {
    for entry in entries.iter_mut() {
        if entry.bo_type.is_some() {
            continue;
        }
        let Some(path) = entry.request_file.as_deref() else {
            continue;
        };
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);

        let bo = identity::extract_business_object(file_name);
        let operation = identity::filename_operation(file_name);

        if let Some(bo) = bo {
            entry.bo_type = Some(bo.bo_type);
            entry.bo_id = Some(bo.bo_id);
        }
        let needs_operation = entry
            .operation
            .as_deref()
            .is_none_or(|op| op == identity::UNKNOWN_OPERATION);
        if needs_operation && operation != identity::UNKNOWN_OPERATION {
            entry.operation = Some(operation.to_string());
        }
    }
}

/// Build one trace from entries that share `trace_id`. `None` if `entries` is
/// empty.
pub fn assemble(trace_id: String, mut entries: Vec<LogEntry>) -> Option<Trace> {
    // Stable: entries with equal timestamps keep discovery order.
    entries.sort_by_key(|e| e.timestamp);

    let start_time = entries.first()?.timestamp;
    let end_time = entries.last()?.timestamp;

    let bo_type = first_non_empty(&entries, |e| e.bo_type.as_ref());
    let bo_id = first_non_empty(&entries, |e| e.bo_id.as_ref());
    let operation = first_non_empty(&entries, |e| e.operation.as_ref());
    let has_errors = entries.iter().any(LogEntry::is_error);

    Some(Trace {
        trace_id,
        start_time,
        end_time,
        duration_ms: (end_time - start_time).num_milliseconds(),
        bo_type,
        bo_id,
        operation,
        has_errors,
        entries,
    })
}

fn first_non_empty<'a>(
    entries: &'a [LogEntry],
    field: impl Fn(&'a LogEntry) -> Option<&'a String>,
) -> Option<String> {
    entries.iter().filter_map(field).find(|v| !v.is_empty()).cloned()
}

/// Group entries by correlation key, in order of first discovery.
///
/// Entries without a key (or with an empty one) never join a trace.
pub fn group_traces(entries: Vec<LogEntry>) -> Vec<Trace> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<LogEntry>)> = Vec::new();

    for entry in entries {
        let Some(key) = entry.trace_id.clone().filter(|k| !k.is_empty()) else {
            continue;
        };
        match index.get(&key) {
            Some(&slot) => groups[slot].1.push(entry),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![entry]));
            }
        }
    }

    groups
        .into_iter()
        .filter_map(|(key, members)| assemble(key, members))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
