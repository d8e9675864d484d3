//! Seed digest canonicalization
//!
//! Computes stable SHA256 digests of seeds for reproducibility

use crate::errors::Result;
use crate::seed::format::SeedFile;
use sha2::{Digest, Sha256};
use strata_core::errors::{ExError, StrataError};

/// Compute a stable digest for a seed
///
/// Specs and snapshots are sorted by id first, so reordering entries in the
/// file does not change the digest. The order of each snapshot's
/// `specRefs` is significant and is kept.
pub fn compute_seed_digest(seed: &SeedFile) -> Result<String> {
    let mut canonical = seed.clone();
    canonical.specs.sort_by(|a, b| a.id.cmp(&b.id));
    canonical.snapshots.sort_by(|a, b| a.id.cmp(&b.id));

    let json = serde_json::to_string(&canonical)
        .map_err(|e| ExError::from(StrataError::from(e)).with_op("seed_digest"))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
