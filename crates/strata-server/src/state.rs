use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use strata_core::cache::shared_diff_cache;
use strata_engine::{DiffService, SqliteSource};

/// Process-wide state shared by every handler
pub struct AppState {
    pub diff: DiffService,
    pub source: SqliteSource,
    pub started_at: Instant,
}

impl AppState {
    /// The source serves as both snapshot resolver and spec projector; the
    /// diff cache is created here and lives as long as the state.
    pub fn new(source: SqliteSource, cache_capacity: NonZeroUsize) -> Arc<Self> {
        let collaborator = Arc::new(source.clone());
        let diff = DiffService::new(
            collaborator.clone(),
            collaborator,
            shared_diff_cache(cache_capacity),
        );

        Arc::new(Self {
            diff,
            source,
            started_at: Instant::now(),
        })
    }
}
