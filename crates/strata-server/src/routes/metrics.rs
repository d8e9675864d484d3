use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use strata_core::cache::CacheStats;
use strata_engine::EntityCounts;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicMetrics {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime_seconds: f64,
    pub counts: EntityCounts,
    pub diff_cache: CacheStats,
}

/// `GET /api/metrics/basic`
pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BasicMetrics>, AppError> {
    let counts = state.source.counts().await?;

    Ok(Json(BasicMetrics {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime_seconds: state.started_at.elapsed().as_secs_f64(),
        counts,
        diff_cache: state.diff.cache_stats(),
    }))
}
