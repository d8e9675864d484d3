//! Strata Core - snapshot diff kernel
//!
//! This crate provides the storage-independent parts of Strata:
//! - Building spec and reconstruction snapshot models
//! - The pure snapshot diff engine (membership delta + field changes)
//! - A pair-keyed LRU cache for diff results
//! - Collaborator traits implemented by the storage layer
//! - The error and logging facilities shared by every crate

pub mod cache;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod source;

#[doc(hidden)]
pub mod __macro_support {
    pub use strata_core_types;
    pub use tracing;
}

// Re-export commonly used types
pub use cache::{CacheKey, CacheStats, DiffCache, PairCache, SharedDiffCache};
pub use diff::{compute_diff, DiffResult};
pub use errors::{ExError, ExErrorKind, Result, StrataError};
pub use model::{BuildingSpec, ReconstructionSnapshot, ResolvedSnapshot, SpecProjection, SpecStatus};
pub use source::{SnapshotResolver, SpecProjector};
