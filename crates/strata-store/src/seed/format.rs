//! Seed file schema
//!
//! Specs and snapshots use the same field names as the JSON API
//! (`architecturalStyle`, `roofHeight_m`, `specRefs`, ...).

use serde::{Deserialize, Serialize};
use strata_core::model::{BuildingSpec, ReconstructionSnapshot};

/// The only schema version this crate reads
pub const SEED_SCHEMA_VERSION: u32 = 1;

/// Top-level seed file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedFile {
    pub schema_version: u32,

    #[serde(default)]
    pub specs: Vec<BuildingSpec>,

    #[serde(default)]
    pub snapshots: Vec<ReconstructionSnapshot>,
}
