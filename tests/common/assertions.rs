//! Domain-specific assertion macros for otrace harnesses.
//!
//! These add context-rich failure messages that make it clear *which* trace
//! invariant was violated and for which correlation key.

use otrace_core::{EntryKind, Trace};

/// Assert the exact list of trace ids, in order.
///
/// ```rust
/// assert_trace_ids!(traces, [TRACE_A, TRACE_B]);
/// ```
#[macro_export]
macro_rules! assert_trace_ids {
    ($traces:expr, [$($id:expr),* $(,)?]) => {{
        let traces: &[otrace_core::Trace] = &$traces;
        let actual: Vec<&str> = traces.iter().map(|t| t.trace_id.as_str()).collect();
        let expected: Vec<&str> = vec![$($id),*];
        pretty_assertions::assert_eq!(actual, expected, "trace ids differ");
    }};
}

/// Assert the kinds of a trace's entries, in timeline order.
///
/// ```rust
/// assert_kinds!(trace, [EntryKind::Request, EntryKind::Response]);
/// ```
#[macro_export]
macro_rules! assert_kinds {
    ($trace:expr, [$($kind:expr),* $(,)?]) => {{
        let trace: &otrace_core::Trace = &$trace;
        let actual: Vec<otrace_core::EntryKind> = trace.entries.iter().map(|e| e.kind).collect();
        let expected: Vec<otrace_core::EntryKind> = vec![$($kind),*];
        if actual != expected {
            panic!(
                "assert_kinds! failed for trace {:?}:\n  expected: {:?}\n  actual:   {:?}",
                trace.trace_id, expected, actual
            );
        }
    }};
}

/// Find a trace by id or panic with the ids that do exist.
pub fn trace_by_id<'a>(traces: &'a [Trace], id: &str) -> &'a Trace {
    traces.iter().find(|t| t.trace_id == id).unwrap_or_else(|| {
        panic!(
            "no trace {id:?}; have {:?}",
            traces.iter().map(|t| &t.trace_id).collect::<Vec<_>>()
        )
    })
}

/// Structural invariants every assembled trace must satisfy.
pub fn assert_timeline_invariants(trace: &Trace) {
    assert!(!trace.entries.is_empty(), "trace {:?} has no entries", trace.trace_id);
    assert!(
        trace.entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
        "trace {:?} entries are not in timestamp order",
        trace.trace_id
    );
    assert!(
        trace.entries.iter().all(|e| e.trace_id.as_deref() == Some(trace.trace_id.as_str())),
        "trace {:?} holds an entry with a different key",
        trace.trace_id
    );
    assert_eq!(trace.start_time, trace.entries[0].timestamp);
    assert_eq!(trace.end_time, trace.entries[trace.entries.len() - 1].timestamp);
    assert_eq!(trace.duration(), trace.end_time - trace.start_time);
    assert_eq!(trace.duration_ms, trace.duration().num_milliseconds());
    assert_eq!(
        trace.has_errors,
        trace.entries.iter().any(|e| e.kind == EntryKind::Error),
        "has_errors disagrees with member kinds for {:?}",
        trace.trace_id
    );
}
