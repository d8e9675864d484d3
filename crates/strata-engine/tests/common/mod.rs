use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use strata_core::cache::shared_diff_cache;
use strata_core::errors::{ExError, ExErrorKind};
use strata_core::model::{BuildingSpec, ResolvedSnapshot, SpecProjection};
use strata_core::source::{SnapshotResolver, SpecProjector};
use std::num::NonZeroUsize;
use strata_engine::DiffService;

/// In-memory collaborator that counts every call
#[derive(Default)]
pub struct CountingStore {
    snapshots: Mutex<HashMap<String, ResolvedSnapshot>>,
    specs: Mutex<HashMap<String, BuildingSpec>>,
    pub resolve_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub fetched_ids: Mutex<Vec<Vec<String>>>,
    failure: Mutex<Option<ExErrorKind>>,
    projection_failure: Mutex<Option<ExErrorKind>>,
}

#[allow(dead_code)]
impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a snapshot and make its specs projectable
    pub fn add_snapshot(&self, snapshot: ResolvedSnapshot) {
        let mut specs = self.specs.lock().unwrap();
        for spec in &snapshot.specs {
            specs.insert(spec.id.clone(), spec.clone());
        }
        self.snapshots
            .lock()
            .unwrap()
            .insert(snapshot.id.clone(), snapshot);
    }

    /// Make every subsequent call fail with `kind`
    pub fn fail_with(&self, kind: Option<ExErrorKind>) {
        *self.failure.lock().unwrap() = kind;
    }

    /// Make only projection calls fail with `kind`
    pub fn fail_projection_with(&self, kind: Option<ExErrorKind>) {
        *self.projection_failure.lock().unwrap() = kind;
    }

    pub fn resolves(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), ExError> {
        match *self.failure.lock().unwrap() {
            Some(kind) => Err(ExError::new(kind).with_message("injected failure")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SnapshotResolver for CountingStore {
    async fn resolve(&self, snapshot_id: &str) -> Result<Option<ResolvedSnapshot>, ExError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.snapshots.lock().unwrap().get(snapshot_id).cloned())
    }
}

#[async_trait]
impl SpecProjector for CountingStore {
    async fn fetch_minimal(&self, spec_ids: &[String]) -> Result<Vec<SpecProjection>, ExError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetched_ids.lock().unwrap().push(spec_ids.to_vec());
        self.check_failure()?;
        if let Some(kind) = *self.projection_failure.lock().unwrap() {
            return Err(ExError::new(kind).with_message("injected projection failure"));
        }
        let specs = self.specs.lock().unwrap();
        // reversed to prove the service restores membership order
        Ok(spec_ids
            .iter()
            .rev()
            .filter_map(|id| specs.get(id).map(BuildingSpec::projection))
            .collect())
    }
}

#[allow(dead_code)]
pub fn service(store: &Arc<CountingStore>, capacity: usize) -> DiffService {
    let cache = shared_diff_cache(NonZeroUsize::new(capacity).unwrap());
    DiffService::new(store.clone(), store.clone(), cache)
}

#[allow(dead_code)]
pub fn spec(id: &str) -> BuildingSpec {
    BuildingSpec::new(id, format!("Building {id}")).unwrap()
}

#[allow(dead_code)]
pub fn snapshot(id: &str, year: i32, specs: Vec<BuildingSpec>) -> ResolvedSnapshot {
    ResolvedSnapshot::new(id, year).with_specs(specs)
}
