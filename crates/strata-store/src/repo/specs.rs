//! Building spec persistence

use crate::errors::{from_insert, from_rusqlite, Result};
use crate::repo::SqliteRepo;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use strata_core::errors::ExError;
use strata_core::model::{BuildingSpec, Height, SpecProjection, SpecStatus};

/// Column list matching [`SpecRow::read`]
pub(crate) const SPEC_COLUMNS: &str = "id, name, architectural_style, roof_height_m, stories, \
     status, year_constructed, year_completed";

/// Ids per `IN (...)` query, below SQLite's host parameter limit
const FETCH_CHUNK: usize = 500;

/// A raw `building_specs` row before status parsing
pub(crate) struct SpecRow {
    id: String,
    name: String,
    architectural_style: Option<String>,
    roof_height_m: Option<f64>,
    stories: Option<u32>,
    status: Option<String>,
    year_constructed: Option<i32>,
    year_completed: Option<i32>,
}

impl SpecRow {
    /// Read the columns of [`SPEC_COLUMNS`], starting at `offset`
    pub(crate) fn read(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            architectural_style: row.get(offset + 2)?,
            roof_height_m: row.get(offset + 3)?,
            stories: row.get(offset + 4)?,
            status: row.get(offset + 5)?,
            year_constructed: row.get(offset + 6)?,
            year_completed: row.get(offset + 7)?,
        })
    }

    pub(crate) fn into_spec(self) -> Result<BuildingSpec> {
        let status = self
            .status
            .map(|s| s.parse::<SpecStatus>())
            .transpose()
            .map_err(|e| ExError::from(e).with_op("read_spec").with_entity_id(&self.id))?;

        let height = (self.roof_height_m.is_some() || self.stories.is_some()).then_some(Height {
            roof_height_m: self.roof_height_m,
            stories: self.stories,
        });

        Ok(BuildingSpec {
            id: self.id,
            name: self.name,
            architectural_style: self.architectural_style,
            height,
            status,
            year_constructed: self.year_constructed,
            year_completed: self.year_completed,
        })
    }
}

impl SqliteRepo {
    /// Insert a new building spec
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if a spec with the same id is stored
    pub fn insert_spec(conn: &Connection, spec: &BuildingSpec) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let height = spec.height.clone().unwrap_or_default();
        conn.execute(
            "INSERT INTO building_specs (id, name, architectural_style, roof_height_m, stories,
                status, year_constructed, year_completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            rusqlite::params![
                spec.id,
                spec.name,
                spec.architectural_style,
                height.roof_height_m,
                height.stories,
                spec.status.map(|s| s.as_str()),
                spec.year_constructed,
                spec.year_completed,
                now,
            ],
        )
        .map_err(|e| from_insert(e, &spec.id))?;

        Ok(())
    }

    /// Insert a spec, or replace every field of an existing one
    pub fn upsert_spec(conn: &Connection, spec: &BuildingSpec) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let height = spec.height.clone().unwrap_or_default();
        conn.execute(
            "INSERT INTO building_specs (id, name, architectural_style, roof_height_m, stories,
                status, year_constructed, year_completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                architectural_style = excluded.architectural_style,
                roof_height_m = excluded.roof_height_m,
                stories = excluded.stories,
                status = excluded.status,
                year_constructed = excluded.year_constructed,
                year_completed = excluded.year_completed,
                updated_at = excluded.updated_at",
            rusqlite::params![
                spec.id,
                spec.name,
                spec.architectural_style,
                height.roof_height_m,
                height.stories,
                spec.status.map(|s| s.as_str()),
                spec.year_constructed,
                spec.year_completed,
                now,
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    pub fn get_spec(conn: &Connection, spec_id: &str) -> Result<Option<BuildingSpec>> {
        let row = conn
            .query_row(
                &format!("SELECT {SPEC_COLUMNS} FROM building_specs WHERE id = ?1"),
                [spec_id],
                |row| SpecRow::read(row, 0),
            )
            .optional()
            .map_err(from_rusqlite)?;

        row.map(SpecRow::into_spec).transpose()
    }

    pub fn spec_exists(conn: &Connection, spec_id: &str) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM building_specs WHERE id = ?1)",
            [spec_id],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)
    }

    pub fn count_specs(conn: &Connection) -> Result<u64> {
        conn.query_row("SELECT COUNT(*) FROM building_specs", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }

    /// Fetch the minimal projection for each stored id in `spec_ids`
    ///
    /// Unknown ids are skipped; result order is unspecified.
    pub fn fetch_minimal_specs(
        conn: &Connection,
        spec_ids: &[String],
    ) -> Result<Vec<SpecProjection>> {
        let mut projections = Vec::with_capacity(spec_ids.len());

        for chunk in spec_ids.chunks(FETCH_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT id, name, year_constructed, year_completed, architectural_style
                 FROM building_specs WHERE id IN ({placeholders})"
            );
            let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter()), |row| {
                    Ok(SpecProjection {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        year_constructed: row.get(2)?,
                        year_completed: row.get(3)?,
                        architectural_style: row.get(4)?,
                    })
                })
                .map_err(from_rusqlite)?;

            for row in rows {
                projections.push(row.map_err(from_rusqlite)?);
            }
        }

        Ok(projections)
    }
}
