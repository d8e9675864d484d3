//! Cached snapshot diff orchestration.
//!
//! Control flow for one request:
//!
//! 1. validate that both ids are present (no cache or storage access before this)
//! 2. consult the cache with the ordered `(from, to)` pair
//! 3. on a miss, resolve both snapshots concurrently
//! 4. compute the membership delta
//! 5. fetch minimal projections for added and removed ids concurrently
//! 6. compare tracked fields of the ids present on both sides
//! 7. assemble the result with `cached: false`
//! 8. store it, then return it
//!
//! Failures at any step are returned without touching the cache.

use futures::try_join;
use serde::Deserialize;
use std::sync::{Arc, MutexGuard};
use std::time::Instant;
use strata_core::cache::{CacheStats, DiffCache, SharedDiffCache};
use strata_core::diff::engine::{assemble, detect_changes, membership_delta, order_projections};
use strata_core::diff::DiffResult;
use strata_core::errors::{ExError, StrataError};
use strata_core::model::SpecProjection;
use strata_core::source::{SnapshotResolver, SpecProjector};
use strata_core::{log_op_end, log_op_error, log_op_start};
use strata_core_types::RequestContext;

const OP_SNAPSHOT_DIFF: &str = "snapshot_diff";

/// Raw diff request as received from a caller, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DiffRequest {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl DiffRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// Both ids, or `MissingSnapshotIds` if either is absent or empty
    pub fn ids(&self) -> Result<(&str, &str), ExError> {
        let from = self.from.as_deref().filter(|s| !s.is_empty());
        let to = self.to.as_deref().filter(|s| !s.is_empty());
        match (from, to) {
            (Some(from), Some(to)) => Ok((from, to)),
            _ => Err(StrataError::MissingSnapshotIds.into()),
        }
    }
}

/// Snapshot diff service with a shared result cache
///
/// Cheap to clone; clones share the collaborators and the cache.
#[derive(Clone)]
pub struct DiffService {
    resolver: Arc<dyn SnapshotResolver>,
    projector: Arc<dyn SpecProjector>,
    cache: SharedDiffCache,
}

impl DiffService {
    pub fn new(
        resolver: Arc<dyn SnapshotResolver>,
        projector: Arc<dyn SpecProjector>,
        cache: SharedDiffCache,
    ) -> Self {
        Self {
            resolver,
            projector,
            cache,
        }
    }

    /// Diff `request.from` against `request.to`
    ///
    /// Errors carry the request and trace ids from `ctx`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if either id is missing or empty
    /// - `NotFound` if either snapshot does not exist
    /// - any infrastructure error raised by the collaborators
    pub async fn compute(
        &self,
        request: &DiffRequest,
        ctx: &RequestContext,
    ) -> Result<DiffResult, ExError> {
        log_op_start!(
            OP_SNAPSHOT_DIFF,
            request_id = ctx.request_id.as_str(),
            from_id = request.from.as_deref().unwrap_or_default(),
            to_id = request.to.as_deref().unwrap_or_default()
        );
        let start = Instant::now();

        let result = self.compute_inner(request).await;

        let elapsed = start.elapsed().as_millis() as u64;
        match result {
            Ok((diff, cache_hit)) => {
                log_op_end!(
                    OP_SNAPSHOT_DIFF,
                    duration_ms = elapsed,
                    request_id = ctx.request_id.as_str(),
                    cache_hit = cache_hit,
                    added = diff.summary.added,
                    removed = diff.summary.removed,
                    changed = diff.summary.changed
                );
                Ok(diff)
            }
            Err(e) => {
                let e = with_context(e, ctx);
                log_op_error!(
                    OP_SNAPSHOT_DIFF,
                    e.clone(),
                    duration_ms = elapsed,
                    request_id = ctx.request_id.as_str()
                );
                Err(e)
            }
        }
    }

    /// Convenience wrapper around [`compute`](Self::compute) with a fresh context
    pub async fn diff(&self, from: &str, to: &str) -> Result<DiffResult, ExError> {
        self.compute(&DiffRequest::new(from, to), &RequestContext::new())
            .await
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    pub fn cache(&self) -> &SharedDiffCache {
        &self.cache
    }

    /// The result plus whether it came from the cache
    async fn compute_inner(&self, request: &DiffRequest) -> Result<(DiffResult, bool), ExError> {
        let (from, to) = request.ids()?;

        if let Some(hit) = self.cached(from, to) {
            return Ok((hit, true));
        }

        let fresh = self.compute_uncached(from, to).await?;
        self.lock_cache().set(from, to, fresh.clone());
        Ok((fresh, false))
    }

    /// A presentation copy of a cached result; the stored entry keeps `cached: false`
    fn cached(&self, from: &str, to: &str) -> Option<DiffResult> {
        let mut cache = self.lock_cache();
        cache.get(from, to).map(|stored| DiffResult {
            cached: true,
            ..stored.clone()
        })
    }

    async fn compute_uncached(&self, from: &str, to: &str) -> Result<DiffResult, ExError> {
        let (from_snap, to_snap) =
            try_join!(self.resolver.resolve(from), self.resolver.resolve(to))?;

        let (from_snap, to_snap) = match (from_snap, to_snap) {
            (Some(a), Some(b)) => (a, b),
            (a, b) => {
                let mut missing = Vec::new();
                if a.is_none() {
                    missing.push(from.to_string());
                }
                if b.is_none() && !(a.is_none() && from == to) {
                    missing.push(to.to_string());
                }
                return Err(StrataError::SnapshotsNotFound { missing }.into());
            }
        };

        let delta = membership_delta(&from_snap, &to_snap);
        let (added_specs, removed_specs) =
            try_join!(self.project(&delta.added), self.project(&delta.removed))?;
        let changed_specs = detect_changes(&from_snap, &to_snap, &delta.unchanged);

        Ok(assemble(
            &from_snap,
            &to_snap,
            &delta,
            added_specs,
            removed_specs,
            changed_specs,
        ))
    }

    async fn project(&self, ids: &[String]) -> Result<Vec<SpecProjection>, ExError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let fetched = self.projector.fetch_minimal(ids).await?;
        Ok(order_projections(ids, fetched))
    }

    fn lock_cache(&self) -> MutexGuard<'_, DiffCache> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn with_context(err: ExError, ctx: &RequestContext) -> ExError {
    let err = err.with_request_id(ctx.request_id.clone());
    match &ctx.trace_id {
        Some(trace_id) => err.with_trace_id(trace_id.clone()),
        None => err,
    }
}
