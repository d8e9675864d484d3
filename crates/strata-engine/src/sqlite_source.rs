//! Async access to the SQLite store.
//!
//! A single `rusqlite::Connection` sits behind a mutex; each operation runs
//! on the blocking thread pool so request handlers never block the runtime.
//!
//! Because every call takes the same lock, the two resolves (and the two
//! projection fetches) that `DiffService` joins run one after the other
//! against SQLite. They are still issued concurrently, so a collaborator
//! with real parallelism gets the fan-out unchanged.

use async_trait::async_trait;
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use strata_core::errors::{ExError, ExErrorKind};
use strata_core::model::{ReconstructionSnapshot, ResolvedSnapshot, SpecProjection};
use strata_core::source::{SnapshotResolver, SpecProjector};
use strata_store::seed::{import_seed, SeedImportSummary};
use strata_store::{db, AutoGenerateFilter, AutoGenerated, SqliteRepo};

/// Row counts reported by the metrics endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCounts {
    pub building_specs: u64,
    pub reconstruction_snapshots: u64,
}

/// Shared, thread-safe handle to the store
#[derive(Clone)]
pub struct SqliteSource {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSource {
    /// Wrap an already migrated connection
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Open (creating if needed) and migrate the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExError> {
        db::open_and_migrate(path).map(Self::new)
    }

    pub fn in_memory() -> Result<Self, ExError> {
        db::open_in_memory_and_migrate().map(Self::new)
    }

    /// Run `f` against the connection on the blocking pool
    pub async fn with_conn<T, F>(&self, op: &'static str, f: F) -> Result<T, ExError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, ExError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| {
                ExError::new(ExErrorKind::Concurrency)
                    .with_op(op)
                    .with_message("connection mutex poisoned")
            })?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op(op)
                .with_message(format!("blocking task failed: {e}"))
        })?
    }

    pub async fn counts(&self) -> Result<EntityCounts, ExError> {
        self.with_conn("count_entities", |conn| {
            Ok(EntityCounts {
                building_specs: SqliteRepo::count_specs(conn)?,
                reconstruction_snapshots: SqliteRepo::count_snapshots(conn)?,
            })
        })
        .await
    }

    pub async fn list_snapshots(
        &self,
        year: Option<i32>,
    ) -> Result<Vec<ReconstructionSnapshot>, ExError> {
        self.with_conn("list_snapshots", move |conn| {
            SqliteRepo::list_snapshots(conn, year)
        })
        .await
    }

    pub async fn auto_generate(&self, filter: AutoGenerateFilter) -> Result<AutoGenerated, ExError> {
        self.with_conn("auto_generate_snapshot", move |conn| {
            SqliteRepo::auto_generate_snapshot(conn, &filter)
        })
        .await
    }

    pub async fn import_seed(&self, path: PathBuf) -> Result<SeedImportSummary, ExError> {
        self.with_conn("seed_import", move |conn| import_seed(&path, conn))
            .await
    }
}

#[async_trait]
impl SnapshotResolver for SqliteSource {
    async fn resolve(&self, snapshot_id: &str) -> Result<Option<ResolvedSnapshot>, ExError> {
        let id = snapshot_id.to_string();
        self.with_conn("resolve_snapshot", move |conn| {
            SqliteRepo::resolve_snapshot(conn, &id)
        })
        .await
    }
}

#[async_trait]
impl SpecProjector for SqliteSource {
    async fn fetch_minimal(&self, spec_ids: &[String]) -> Result<Vec<SpecProjection>, ExError> {
        let ids = spec_ids.to_vec();
        self.with_conn("fetch_minimal_specs", move |conn| {
            SqliteRepo::fetch_minimal_specs(conn, &ids)
        })
        .await
    }
}
