//! Reconstruction snapshot persistence

use crate::errors::{from_insert, from_rusqlite, Result};
use crate::repo::specs::{SpecRow, SPEC_COLUMNS};
use crate::repo::SqliteRepo;
use rusqlite::{Connection, OptionalExtension, Transaction};
use strata_core::model::{ReconstructionSnapshot, ResolvedSnapshot};

/// Header columns of `reconstruction_snapshots`
struct SnapshotHeader {
    id: String,
    year: i32,
    label: Option<String>,
    description: Option<String>,
}

impl SnapshotHeader {
    fn into_snapshot(self, spec_refs: Vec<String>) -> ReconstructionSnapshot {
        ReconstructionSnapshot {
            id: self.id,
            year: self.year,
            label: self.label,
            description: self.description,
            spec_refs,
        }
    }
}

fn get_header(conn: &Connection, snapshot_id: &str) -> Result<Option<SnapshotHeader>> {
    conn.query_row(
        "SELECT id, year, label, description FROM reconstruction_snapshots WHERE id = ?1",
        [snapshot_id],
        |row| {
            Ok(SnapshotHeader {
                id: row.get(0)?,
                year: row.get(1)?,
                label: row.get(2)?,
                description: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(from_rusqlite)
}

fn load_refs(conn: &Connection, snapshot_id: &str) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT spec_id FROM snapshot_spec_refs WHERE snapshot_id = ?1 ORDER BY position")
        .map_err(from_rusqlite)?;
    let refs = stmt
        .query_map([snapshot_id], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(refs)
}

fn write_refs(conn: &Connection, snapshot_id: &str, spec_refs: &[String]) -> Result<()> {
    let mut stmt = conn
        .prepare(
            "INSERT INTO snapshot_spec_refs (snapshot_id, position, spec_id) VALUES (?1, ?2, ?3)",
        )
        .map_err(from_rusqlite)?;
    for (position, spec_id) in spec_refs.iter().enumerate() {
        stmt.execute(rusqlite::params![snapshot_id, position as i64, spec_id])
            .map_err(from_rusqlite)?;
    }
    Ok(())
}

impl SqliteRepo {
    /// Insert a new snapshot and its ordered references atomically
    ///
    /// References are stored as given; they are not checked against
    /// `building_specs`.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if a snapshot with the same id is stored
    pub fn insert_snapshot(conn: &mut Connection, snapshot: &ReconstructionSnapshot) -> Result<()> {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        Self::insert_snapshot_tx(&tx, snapshot)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(())
    }

    /// Insert a snapshot within a transaction
    pub fn insert_snapshot_tx(tx: &Transaction, snapshot: &ReconstructionSnapshot) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        tx.execute(
            "INSERT INTO reconstruction_snapshots (id, year, label, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![
                snapshot.id,
                snapshot.year,
                snapshot.label,
                snapshot.description,
                now
            ],
        )
        .map_err(|e| from_insert(e, &snapshot.id))?;

        write_refs(tx, &snapshot.id, &snapshot.spec_refs)
    }

    /// Insert a snapshot or replace an existing one, references included
    pub fn upsert_snapshot_tx(tx: &Transaction, snapshot: &ReconstructionSnapshot) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        tx.execute(
            "INSERT INTO reconstruction_snapshots (id, year, label, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(id) DO UPDATE SET
                year = excluded.year,
                label = excluded.label,
                description = excluded.description,
                updated_at = excluded.updated_at",
            rusqlite::params![
                snapshot.id,
                snapshot.year,
                snapshot.label,
                snapshot.description,
                now
            ],
        )
        .map_err(from_rusqlite)?;

        tx.execute(
            "DELETE FROM snapshot_spec_refs WHERE snapshot_id = ?1",
            [&snapshot.id],
        )
        .map_err(from_rusqlite)?;

        write_refs(tx, &snapshot.id, &snapshot.spec_refs)
    }

    /// Load a snapshot in stored form (references unresolved)
    pub fn get_snapshot(
        conn: &Connection,
        snapshot_id: &str,
    ) -> Result<Option<ReconstructionSnapshot>> {
        let Some(header) = get_header(conn, snapshot_id)? else {
            return Ok(None);
        };
        let refs = load_refs(conn, snapshot_id)?;
        Ok(Some(header.into_snapshot(refs)))
    }

    pub fn snapshot_exists(conn: &Connection, snapshot_id: &str) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM reconstruction_snapshots WHERE id = ?1)",
            [snapshot_id],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)
    }

    /// List snapshots ordered by year then id, optionally for a single year
    pub fn list_snapshots(
        conn: &Connection,
        year: Option<i32>,
    ) -> Result<Vec<ReconstructionSnapshot>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, year, label, description FROM reconstruction_snapshots
                 WHERE ?1 IS NULL OR year = ?1
                 ORDER BY year, id",
            )
            .map_err(from_rusqlite)?;
        let headers = stmt
            .query_map([year], |row| {
                Ok(SnapshotHeader {
                    id: row.get(0)?,
                    year: row.get(1)?,
                    label: row.get(2)?,
                    description: row.get(3)?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        headers
            .into_iter()
            .map(|header| {
                let refs = load_refs(conn, &header.id)?;
                Ok(header.into_snapshot(refs))
            })
            .collect()
    }

    /// Load a snapshot with its referenced specs populated in reference order
    ///
    /// Dangling references are dropped; duplicate references yield duplicate
    /// specs.
    pub fn resolve_snapshot(conn: &Connection, snapshot_id: &str) -> Result<Option<ResolvedSnapshot>> {
        let Some(header) = get_header(conn, snapshot_id)? else {
            return Ok(None);
        };

        let columns = SPEC_COLUMNS
            .split(", ")
            .map(|c| format!("s.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {columns} FROM snapshot_spec_refs r
                 JOIN building_specs s ON s.id = r.spec_id
                 WHERE r.snapshot_id = ?1
                 ORDER BY r.position"
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([snapshot_id], |row| SpecRow::read(row, 0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        let specs = rows
            .into_iter()
            .map(SpecRow::into_spec)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(ResolvedSnapshot {
            id: header.id,
            year: header.year,
            label: header.label,
            specs,
        }))
    }

    pub fn count_snapshots(conn: &Connection) -> Result<u64> {
        conn.query_row("SELECT COUNT(*) FROM reconstruction_snapshots", [], |row| {
            row.get(0)
        })
        .map_err(from_rusqlite)
    }
}
