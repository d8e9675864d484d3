//! Snapshot diff output types.
//!
//! Serialized field names match the public JSON contract (camelCase).
//! These types are output only and are never deserialized.

use crate::model::SpecProjection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The result of diffing snapshot `from` against snapshot `to`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub from: SnapshotSide,
    pub to: SnapshotSide,
    pub summary: DiffSummary,
    /// Specs referenced by `to` but not `from`
    pub added_specs: Vec<SpecProjection>,
    /// Specs referenced by `from` but not `to`
    pub removed_specs: Vec<SpecProjection>,
    /// Specs on both sides whose tracked fields differ
    pub changed_specs: Vec<ChangedSpec>,
    /// True when this copy was served from the cache
    pub cached: bool,
}

/// Summary of one input snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotSide {
    pub id: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Number of resolved spec references, duplicates included
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub changed: usize,
}

/// Field-level changes for one spec present in both snapshots
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangedSpec {
    pub id: String,
    /// Name as recorded in the `to` snapshot
    pub name: String,
    /// Keyed by tracked field path, e.g. `height.stories`
    pub changes: BTreeMap<String, FieldChange>,
}

/// Before/after pair for one tracked field; `None` serializes as `null`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub from: Option<TrackedValue>,
    pub to: Option<TrackedValue>,
}

/// A normalized, comparable tracked-field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TrackedValue {
    Count(u32),
    Meters(f64),
    Text(String),
}

impl fmt::Display for TrackedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackedValue::Count(n) => write!(f, "{n}"),
            TrackedValue::Meters(m) => write!(f, "{m}"),
            TrackedValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for TrackedValue {
    fn from(n: u32) -> Self {
        TrackedValue::Count(n)
    }
}

impl From<f64> for TrackedValue {
    fn from(m: f64) -> Self {
        TrackedValue::Meters(m)
    }
}

impl From<&str> for TrackedValue {
    fn from(s: &str) -> Self {
        TrackedValue::Text(s.to_string())
    }
}
