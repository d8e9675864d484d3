//! Pair-keyed memoization cache for diff results.
//!
//! A bounded, strict least-recently-used map keyed by an ordered
//! `(from, to)` snapshot id pair. The cache does no locking of its own: a
//! host that shares one instance across request handlers wraps it in a
//! mutex ([`SharedDiffCache`]) so that the recency bump in `get` and the
//! evict-then-insert in `set` each happen as one step.

pub mod pair_cache;

use crate::diff::model::DiffResult;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

pub use pair_cache::{CacheEntry, CacheKey, CacheStats, PairCache};

/// Capacity used when none is configured
pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

/// The diff engine's cache
pub type DiffCache = PairCache<DiffResult>;

/// A diff cache shared between concurrent request handlers
pub type SharedDiffCache = Arc<Mutex<DiffCache>>;

/// Build a fresh shared cache with the given capacity
pub fn shared_diff_cache(capacity: NonZeroUsize) -> SharedDiffCache {
    Arc::new(Mutex::new(DiffCache::new(capacity)))
}
