//! Snapshot auto-generation from spec filters

use crate::errors::{from_rusqlite, Result};
use crate::repo::SqliteRepo;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use strata_core::model::{ReconstructionSnapshot, SpecStatus};

pub const DEFAULT_DESCRIPTION: &str = "Automatically generated snapshot from filters";

/// Selection criteria for [`SqliteRepo::auto_generate_snapshot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoGenerateFilter {
    /// Year of the generated snapshot; also the cutoff unless `before_year` is set
    pub year: i32,
    /// Case-insensitive substring of the architectural style
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub status: Option<SpecStatus>,
    #[serde(default)]
    pub before_year: Option<i32>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl AutoGenerateFilter {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            style: None,
            status: None,
            before_year: None,
            label: None,
            description: None,
        }
    }

    /// Inclusive completion/construction year bound
    pub fn cutoff(&self) -> i32 {
        self.before_year.unwrap_or(self.year)
    }
}

/// Outcome of an auto-generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoGenerated {
    pub id: String,
    pub count: usize,
}

impl SqliteRepo {
    /// Ids of specs completed or constructed on or before the filter's cutoff
    ///
    /// Specs with neither year never match. Order is by id.
    pub fn select_spec_ids(conn: &Connection, filter: &AutoGenerateFilter) -> Result<Vec<String>> {
        let style = filter.style.as_deref().filter(|s| !s.is_empty());
        let status = filter.status.map(|s| s.as_str());

        let mut stmt = conn
            .prepare(
                "SELECT id FROM building_specs
                 WHERE (year_completed <= ?1 OR year_constructed <= ?1)
                   AND (?2 IS NULL OR instr(lower(architectural_style), lower(?2)) > 0)
                   AND (?3 IS NULL OR status = ?3)
                 ORDER BY id",
            )
            .map_err(from_rusqlite)?;
        let ids = stmt
            .query_map(rusqlite::params![filter.cutoff(), style, status], |row| {
                row.get(0)
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(from_rusqlite)?;
        Ok(ids)
    }

    /// Persist a new snapshot referencing every spec that matches `filter`
    ///
    /// The snapshot gets a fresh UUIDv7 id. An empty match still creates a
    /// snapshot with no references.
    pub fn auto_generate_snapshot(
        conn: &mut Connection,
        filter: &AutoGenerateFilter,
    ) -> Result<AutoGenerated> {
        let tx = conn.transaction().map_err(from_rusqlite)?;

        let spec_refs = Self::select_spec_ids(&tx, filter)?;
        let snapshot = ReconstructionSnapshot {
            id: uuid::Uuid::now_v7().to_string(),
            year: filter.year,
            label: Some(
                filter
                    .label
                    .clone()
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| format!("Auto {}", filter.year)),
            ),
            description: Some(
                filter
                    .description
                    .clone()
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            ),
            spec_refs,
        };
        Self::insert_snapshot_tx(&tx, &snapshot)?;

        tx.commit().map_err(from_rusqlite)?;

        tracing::info!(
            snapshot_id = %snapshot.id,
            year = snapshot.year,
            count = snapshot.spec_refs.len(),
            "auto-generated snapshot"
        );

        Ok(AutoGenerated {
            id: snapshot.id,
            count: snapshot.spec_refs.len(),
        })
    }
}
