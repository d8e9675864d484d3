use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    Json,
};
use strata_core::diff::DiffResult;
use strata_core::errors::{ExError, StrataError};
use strata_core_types::{RequestContext, TraceId};
use strata_engine::DiffRequest;

use crate::{error::AppError, state::AppState};

/// Optional upstream trace id, copied into logs and errors
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// `GET /api/reconstructions/diff?from=<id>&to=<id>`
///
/// A query string that cannot be decoded (repeated or malformed keys) is
/// answered like a missing id.
pub async fn diff_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<DiffRequest>, QueryRejection>,
) -> Result<Json<DiffResult>, AppError> {
    let Query(request) = query.map_err(|rejection| {
        tracing::debug!(%rejection, "rejected diff query string");
        AppError::from(ExError::from(StrataError::MissingSnapshotIds))
    })?;

    let mut ctx = RequestContext::new();
    if let Some(trace) = headers
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        ctx = ctx.with_trace_id(TraceId::from_string(trace.to_string()));
    }

    let diff = state.diff.compute(&request, &ctx).await?;
    Ok(Json(diff))
}
