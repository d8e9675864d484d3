//! Domain models consumed by the diff engine
//!
//! Building specs and reconstruction snapshots are owned by the storage
//! layer; the core only reads them.

pub mod building_spec;
pub mod snapshot;

pub use building_spec::{BuildingSpec, Height, SpecProjection, SpecStatus};
pub use snapshot::{ReconstructionSnapshot, ResolvedSnapshot};
