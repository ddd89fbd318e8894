//! HTTP layer — exposes the analyzer as a small JSON API.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /health` | `{"status":"ok"}` |
//! | `GET /api/traces?search=&from=&to=&bo_type=&bo_id=&operation=&has_errors=` | `[Trace]` |
//! | `GET /api/traces/{trace_id}` | `Trace`, or 404 |
//! | `GET /api/filter-options` | `FilterOptions` |
//!
//! `from`/`to` use ISO-8601 without a zone (`2025-01-01T12:00:00`).

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use otrace_core::{FilterOptions, LogAnalyzer, SearchFilters, SnapshotSource, Trace};
use serde_json::{json, Value};
use thiserror::Error;

/// Errors a handler can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("trace not found: {0}")]
    TraceNotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::TraceNotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the router around a shared analyzer.
pub fn router<S>(analyzer: Arc<LogAnalyzer<S>>) -> Router
where
    S: SnapshotSource + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/api/traces", get(list_traces::<S>))
        .route("/api/traces/{trace_id}", get(get_trace::<S>))
        .route("/api/filter-options", get(filter_options::<S>))
        .with_state(analyzer)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve<S>(analyzer: Arc<LogAnalyzer<S>>, addr: &str) -> anyhow::Result<()>
where
    S: SnapshotSource + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "otrace listening");
    axum::serve(listener, router(analyzer)).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_traces<S: SnapshotSource>(
    State(analyzer): State<Arc<LogAnalyzer<S>>>,
    Query(filters): Query<SearchFilters>,
) -> Json<Vec<Trace>> {
    Json(analyzer.query_traces(&filters).await)
}

async fn get_trace<S: SnapshotSource>(
    State(analyzer): State<Arc<LogAnalyzer<S>>>,
    Path(trace_id): Path<String>,
) -> Result<Json<Trace>, ApiError> {
    let trace = analyzer.get_trace(&trace_id).await;
    trace.map(Json).ok_or(ApiError::TraceNotFound(trace_id))
}

async fn filter_options<S: SnapshotSource>(
    State(analyzer): State<Arc<LogAnalyzer<S>>>,
) -> Json<FilterOptions> {
    Json(analyzer.filter_options().await)
}
