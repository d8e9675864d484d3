//! Seed parser with validation
//!
//! Parses YAML and validates schema version, id uniqueness, and that every
//! snapshot reference names a spec in the seed or already in the database

use crate::errors::{io_error, seed_validation, Result};
use crate::repo::SqliteRepo;
use crate::seed::format::{SeedFile, SEED_SCHEMA_VERSION};
use rusqlite::Connection;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a seed file from a path
pub fn parse_seed_file(path: &Path) -> Result<SeedFile> {
    parse_seed_file_with_db(path, None)
}

/// Parse a seed file with optional database context for cross-seed references
pub fn parse_seed_file_with_db(path: &Path, conn: Option<&Connection>) -> Result<SeedFile> {
    let content = fs::read_to_string(path).map_err(|e| io_error("seed_read", e))?;

    parse_seed_str_with_db(&content, conn)
}

/// Parse a seed from a string
pub fn parse_seed_str(content: &str) -> Result<SeedFile> {
    parse_seed_str_with_db(content, None)
}

/// Parse a seed from a string with optional database context
pub fn parse_seed_str_with_db(content: &str, conn: Option<&Connection>) -> Result<SeedFile> {
    let seed: SeedFile = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("YAML parse error: {}", e)))?;

    validate_seed(&seed, conn)?;

    Ok(seed)
}

fn validate_seed(seed: &SeedFile, conn: Option<&Connection>) -> Result<()> {
    if seed.schema_version != SEED_SCHEMA_VERSION {
        return Err(seed_validation(&format!(
            "Unsupported schema_version: {}. Expected {}",
            seed.schema_version, SEED_SCHEMA_VERSION
        )));
    }

    let mut spec_ids = HashSet::new();
    for spec in &seed.specs {
        if spec.id.trim().is_empty() {
            return Err(seed_validation("Spec id cannot be empty"));
        }
        if spec.name.trim().is_empty() {
            return Err(seed_validation(&format!("Spec {} has an empty name", spec.id)));
        }
        if !spec_ids.insert(spec.id.as_str()) {
            return Err(seed_validation(&format!("Duplicate spec id {}", spec.id)));
        }
    }

    let mut snapshot_ids = HashSet::new();
    for snapshot in &seed.snapshots {
        if snapshot.id.trim().is_empty() {
            return Err(seed_validation("Snapshot id cannot be empty"));
        }
        if !snapshot_ids.insert(snapshot.id.as_str()) {
            return Err(seed_validation(&format!(
                "Duplicate snapshot id {}",
                snapshot.id
            )));
        }

        for spec_ref in &snapshot.spec_refs {
            if spec_ids.contains(spec_ref.as_str()) {
                continue;
            }
            let in_db = match conn {
                Some(conn) => SqliteRepo::spec_exists(conn, spec_ref)?,
                None => false,
            };
            if !in_db {
                return Err(seed_validation(&format!(
                    "Snapshot {} references non-existent spec: {}",
                    snapshot.id, spec_ref
                )));
            }
        }
    }

    Ok(())
}
