//! Tracked fields and their typed accessors.

use crate::diff::model::{FieldChange, TrackedValue};
use crate::model::BuildingSpec;
use std::collections::BTreeMap;

/// A building spec attribute monitored for change detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedField {
    ArchitecturalStyle,
    RoofHeight,
    Stories,
    Status,
}

impl TrackedField {
    pub const ALL: [TrackedField; 4] = [
        TrackedField::ArchitecturalStyle,
        TrackedField::RoofHeight,
        TrackedField::Stories,
        TrackedField::Status,
    ];

    /// Dotted path used as the key in a change report
    pub fn path(&self) -> &'static str {
        match self {
            TrackedField::ArchitecturalStyle => "architecturalStyle",
            TrackedField::RoofHeight => "height.roofHeight_m",
            TrackedField::Stories => "height.stories",
            TrackedField::Status => "status",
        }
    }

    /// Read the field, `None` when the value or its parent record is absent
    pub fn value(&self, spec: &BuildingSpec) -> Option<TrackedValue> {
        match self {
            TrackedField::ArchitecturalStyle => spec
                .architectural_style
                .as_deref()
                .map(TrackedValue::from),
            TrackedField::RoofHeight => spec
                .height
                .as_ref()
                .and_then(|h| h.roof_height_m)
                .map(TrackedValue::Meters),
            TrackedField::Stories => spec
                .height
                .as_ref()
                .and_then(|h| h.stories)
                .map(TrackedValue::Count),
            TrackedField::Status => spec.status.map(|s| TrackedValue::from(s.as_str())),
        }
    }
}

/// Compare two copies of the same spec across every tracked field.
///
/// Only differing fields appear in the result; an empty map means the
/// copies agree on all tracked fields.
pub fn field_changes(from: &BuildingSpec, to: &BuildingSpec) -> BTreeMap<String, FieldChange> {
    TrackedField::ALL
        .iter()
        .filter_map(|field| {
            let before = field.value(from);
            let after = field.value(to);
            (before != after).then(|| {
                (
                    field.path().to_string(),
                    FieldChange {
                        from: before,
                        to: after,
                    },
                )
            })
        })
        .collect()
}
