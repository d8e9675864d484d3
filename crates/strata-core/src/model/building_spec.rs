//! Building specification model

use crate::errors::{Result, StrataError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a building at the time a spec was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecStatus {
    Existing,
    Demolished,
    UnderConstruction,
    Planned,
}

impl SpecStatus {
    pub const ALL: [SpecStatus; 4] = [
        SpecStatus::Existing,
        SpecStatus::Demolished,
        SpecStatus::UnderConstruction,
        SpecStatus::Planned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecStatus::Existing => "existing",
            SpecStatus::Demolished => "demolished",
            SpecStatus::UnderConstruction => "under_construction",
            SpecStatus::Planned => "planned",
        }
    }
}

impl fmt::Display for SpecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecStatus {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self> {
        SpecStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StrataError::InvalidSpecStatus {
                value: s.to_string(),
            })
    }
}

/// Nested height record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Height {
    /// Highest architectural point, meters
    #[serde(rename = "roofHeight_m", default, skip_serializing_if = "Option::is_none")]
    pub roof_height_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories: Option<u32>,
}

/// A single building's architectural record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingSpec {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architectural_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Height>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SpecStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_constructed: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_completed: Option<i32>,
}

impl BuildingSpec {
    /// Create a spec with only the required fields
    ///
    /// # Errors
    ///
    /// `InvalidSpec` if the id or name is empty
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let name = name.into();
        if id.trim().is_empty() {
            return Err(StrataError::InvalidSpec {
                reason: "id cannot be empty".to_string(),
            });
        }
        if name.trim().is_empty() {
            return Err(StrataError::InvalidSpec {
                reason: format!("name cannot be empty (spec {id})"),
            });
        }
        Ok(Self {
            id,
            name,
            architectural_style: None,
            height: None,
            status: None,
            year_constructed: None,
            year_completed: None,
        })
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.architectural_style = Some(style.into());
        self
    }

    pub fn with_roof_height(mut self, meters: f64) -> Self {
        self.height.get_or_insert_with(Height::default).roof_height_m = Some(meters);
        self
    }

    pub fn with_stories(mut self, stories: u32) -> Self {
        self.height.get_or_insert_with(Height::default).stories = Some(stories);
        self
    }

    pub fn with_status(mut self, status: SpecStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_years(mut self, constructed: Option<i32>, completed: Option<i32>) -> Self {
        self.year_constructed = constructed;
        self.year_completed = completed;
        self
    }

    /// The minimal projection reported for added/removed specs
    pub fn projection(&self) -> SpecProjection {
        SpecProjection {
            id: self.id.clone(),
            name: self.name.clone(),
            year_constructed: self.year_constructed,
            year_completed: self.year_completed,
            architectural_style: self.architectural_style.clone(),
        }
    }
}

/// Minimal field projection of a spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecProjection {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_constructed: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_completed: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architectural_style: Option<String>,
}
