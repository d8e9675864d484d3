//! Storage collaborator interfaces used by the diff service.

use crate::errors::ExError;
use crate::model::{ResolvedSnapshot, SpecProjection};
use async_trait::async_trait;

/// Resolves a snapshot id to the snapshot with its specs populated.
///
/// # Implementations
///
/// - `SqliteSource` in `strata-engine`: SQLite-backed
/// - test doubles that count calls
#[async_trait]
pub trait SnapshotResolver: Send + Sync {
    /// Returns `None` if no snapshot has this id.
    ///
    /// Spec references whose target no longer exists are left out of the
    /// resolved `specs`.
    ///
    /// # Errors
    ///
    /// Any infrastructure failure of the backing store.
    async fn resolve(&self, snapshot_id: &str) -> Result<Option<ResolvedSnapshot>, ExError>;
}

/// Fetches minimal projections for a list of spec ids.
#[async_trait]
pub trait SpecProjector: Send + Sync {
    /// Unknown ids are skipped. Result order is unspecified.
    ///
    /// # Errors
    ///
    /// Any infrastructure failure of the backing store.
    async fn fetch_minimal(&self, spec_ids: &[String]) -> Result<Vec<SpecProjection>, ExError>;
}
