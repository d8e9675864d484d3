//! Reconstruction snapshot model

use crate::model::building_spec::BuildingSpec;
use serde::{Deserialize, Serialize};

/// A named, year-tagged list of building spec references, as stored
///
/// `spec_refs` keeps insertion order and may contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructionSnapshot {
    pub id: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub spec_refs: Vec<String>,
}

/// A snapshot with its spec references populated
///
/// References to specs that no longer exist are absent from `specs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSnapshot {
    pub id: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub specs: Vec<BuildingSpec>,
}

impl ResolvedSnapshot {
    pub fn new(id: impl Into<String>, year: i32) -> Self {
        Self {
            id: id.into(),
            year,
            label: None,
            specs: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_specs(mut self, specs: Vec<BuildingSpec>) -> Self {
        self.specs = specs;
        self
    }

    /// Spec ids in reference order, duplicates included
    pub fn spec_ids(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.id.as_str())
    }
}
