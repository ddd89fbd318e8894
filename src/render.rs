//! Plain-text rendering of traces for the `traces` and `trace` subcommands.

use otrace_core::parser::format_timestamp;
use otrace_core::Trace;

const ID_WIDTH: usize = 38;
const OP_WIDTH: usize = 16;
const BO_WIDTH: usize = 18;

/// One row per trace with a header line.
pub fn trace_table(traces: &[Trace]) -> String {
    let mut out = format!(
        "{:<ID_WIDTH$} {:<23} {:>10} {:<OP_WIDTH$} {:<BO_WIDTH$} {:>3} {:>7}\n",
        "TRACE", "START", "DURATION", "OPERATION", "BUSINESS OBJECT", "ERR", "ENTRIES"
    );
    for trace in traces {
        let bo = match (&trace.bo_type, &trace.bo_id) {
            (Some(t), Some(id)) => format!("{t}_{id}"),
            (Some(t), None) => t.clone(),
            _ => "-".to_string(),
        };
        out.push_str(&format!(
            "{:<ID_WIDTH$} {:<23} {:>10} {:<OP_WIDTH$} {:<BO_WIDTH$} {:>3} {:>7}\n",
            trace.trace_id,
            format_timestamp(&trace.start_time),
            format!("{}ms", trace.duration_ms),
            trace.operation.as_deref().unwrap_or("-"),
            bo,
            if trace.has_errors { "yes" } else { "" },
            trace.entries.len(),
        ));
    }
    out
}

/// A single trace as a timeline, one entry per line.
pub fn trace_timeline(trace: &Trace) -> String {
    let mut out = format!(
        "{} ({} entries, {}ms)\n",
        trace.trace_id,
        trace.entries.len(),
        trace.duration_ms
    );
    for entry in &trace.entries {
        out.push_str(&format!(
            "  {} [{}] {:<15} {}\n",
            format_timestamp(&entry.timestamp),
            entry.level,
            entry.kind.to_string(),
            entry.message
        ));
        for (label, file) in [
            ("request", &entry.request_file),
            ("response", &entry.response_file),
            ("map", &entry.map_file),
        ] {
            if let Some(file) = file {
                out.push_str(&format!("      {label}: {file}\n"));
            }
        }
    }
    out
}
