//! Seed importer orchestration

use crate::errors::{from_rusqlite, Result};
use crate::repo::SqliteRepo;
use crate::seed::digest::compute_seed_digest;
use crate::seed::format::SeedFile;
use crate::seed::parser::{parse_seed_file_with_db, parse_seed_str_with_db};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use strata_core::{log_op_end, log_op_error, log_op_start};

/// What an import wrote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedImportSummary {
    pub specs: usize,
    pub snapshots: usize,
    pub seed_digest: String,
}

/// Import a seed file into the database
///
/// 1. Parses and validates the YAML, checking the database for references
///    the seed itself does not define
/// 2. Computes the seed digest
/// 3. Upserts every spec, then every snapshot, in one transaction
pub fn import_seed(path: &Path, conn: &mut Connection) -> Result<SeedImportSummary> {
    log_op_start!("seed_import", path = %path.display());
    let start = Instant::now();

    let result = match parse_seed_file_with_db(path, Some(&*conn)) {
        Ok(seed) => write_seed(&seed, conn),
        Err(e) => Err(e),
    };
    finish(result, start)
}

/// Import a seed held in memory
pub fn import_seed_str(content: &str, conn: &mut Connection) -> Result<SeedImportSummary> {
    log_op_start!("seed_import");
    let start = Instant::now();

    let result = match parse_seed_str_with_db(content, Some(&*conn)) {
        Ok(seed) => write_seed(&seed, conn),
        Err(e) => Err(e),
    };
    finish(result, start)
}

fn finish(result: Result<SeedImportSummary>, start: Instant) -> Result<SeedImportSummary> {
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(summary) => {
            log_op_end!(
                "seed_import",
                duration_ms = duration_ms,
                specs = summary.specs,
                snapshots = summary.snapshots
            );
        }
        Err(e) => {
            log_op_error!("seed_import", e.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn write_seed(seed: &SeedFile, conn: &mut Connection) -> Result<SeedImportSummary> {
    let seed_digest = compute_seed_digest(seed)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;

    for spec in &seed.specs {
        SqliteRepo::upsert_spec(&tx, spec)?;
    }
    for snapshot in &seed.snapshots {
        SqliteRepo::upsert_snapshot_tx(&tx, snapshot)?;
    }

    tx.commit().map_err(from_rusqlite)?;

    Ok(SeedImportSummary {
        specs: seed.specs.len(),
        snapshots: seed.snapshots.len(),
        seed_digest,
    })
}
