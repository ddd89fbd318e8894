//! [`LogAnalyzer`] — the query layer bound to a [`SnapshotSource`].
//!
//! Each call takes a fresh snapshot and runs the whole pipeline on it.
//! Concurrent calls share nothing but the (read-only) source.

use crate::query;
use crate::types::{FilterOptions, SearchFilters, SnapshotSource, Trace};

pub struct LogAnalyzer<S> {
    source: S,
}

impl<S: SnapshotSource> LogAnalyzer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn query_traces(&self, filters: &SearchFilters) -> Vec<Trace> {
        let snapshot = self.source.snapshot().await;
        let traces = query::query_traces(&snapshot, filters);
        tracing::info!(
            trace_count = traces.len(),
            log_files = snapshot.log_files.len(),
            "analyzer: traces queried"
        );
        traces
    }

    pub async fn get_trace(&self, trace_id: &str) -> Option<Trace> {
        let snapshot = self.source.snapshot().await;
        let trace = query::get_trace(&snapshot, trace_id);
        tracing::info!(trace_id, found = trace.is_some(), "analyzer: trace lookup");
        trace
    }

    pub async fn filter_options(&self) -> FilterOptions {
        let snapshot = self.source.snapshot().await;
        query::filter_options(&snapshot)
    }
}
