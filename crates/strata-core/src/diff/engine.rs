//! Snapshot diff computation.
//!
//! The pure entry point is [`compute_diff`], which diffs two resolved
//! snapshots using the specs they carry. The building blocks
//! ([`membership_delta`], [`detect_changes`], [`assemble`]) are public so the
//! orchestrating service can source added/removed projections elsewhere.

use crate::diff::fields::field_changes;
use crate::diff::model::{ChangedSpec, DiffResult, DiffSummary, SnapshotSide};
use crate::model::{BuildingSpec, ResolvedSnapshot, SpecProjection};
use std::collections::{HashMap, HashSet};

/// Set differences between two snapshots' spec ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDelta {
    /// In `to` but not `from`, in `to` reference order
    pub added: Vec<String>,
    /// In `from` but not `to`, in `from` reference order
    pub removed: Vec<String>,
    /// In both, in `to` reference order
    pub unchanged: Vec<String>,
}

/// Distinct spec ids in first-occurrence order
pub fn distinct_ids(snapshot: &ResolvedSnapshot) -> Vec<String> {
    let mut seen = HashSet::new();
    snapshot
        .spec_ids()
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Compute added, removed and unchanged ids.
///
/// Duplicate references collapse to one id. `from` and `to` are never
/// swapped, so `membership_delta(a, b).added == membership_delta(b, a).removed`.
pub fn membership_delta(from: &ResolvedSnapshot, to: &ResolvedSnapshot) -> MembershipDelta {
    let from_ids = distinct_ids(from);
    let to_ids = distinct_ids(to);

    let from_set: HashSet<&str> = from_ids.iter().map(String::as_str).collect();
    let to_set: HashSet<&str> = to_ids.iter().map(String::as_str).collect();

    let (unchanged, added): (Vec<String>, Vec<String>) = to_ids
        .iter()
        .cloned()
        .partition(|id| from_set.contains(id.as_str()));

    let removed = from_ids
        .into_iter()
        .filter(|id| !to_set.contains(id.as_str()))
        .collect();

    MembershipDelta {
        added,
        removed,
        unchanged,
    }
}

/// Index specs by id; when a snapshot references a spec more than once the
/// last copy wins.
fn index_specs(snapshot: &ResolvedSnapshot) -> HashMap<&str, &BuildingSpec> {
    snapshot.specs.iter().map(|s| (s.id.as_str(), s)).collect()
}

/// Field-level changes for the ids present on both sides.
///
/// Output order follows `unchanged`. Specs whose tracked fields all agree
/// are omitted.
pub fn detect_changes(
    from: &ResolvedSnapshot,
    to: &ResolvedSnapshot,
    unchanged: &[String],
) -> Vec<ChangedSpec> {
    let from_by_id = index_specs(from);
    let to_by_id = index_specs(to);

    unchanged
        .iter()
        .filter_map(|id| {
            let before = from_by_id.get(id.as_str())?;
            let after = to_by_id.get(id.as_str())?;
            let changes = field_changes(before, after);
            (!changes.is_empty()).then(|| ChangedSpec {
                id: id.clone(),
                name: after.name.clone(),
                changes,
            })
        })
        .collect()
}

/// Reorder fetched projections to follow `ids`.
///
/// Projections whose id is not listed are dropped.
pub fn order_projections(ids: &[String], projections: Vec<SpecProjection>) -> Vec<SpecProjection> {
    let position: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    let mut ordered: Vec<(usize, SpecProjection)> = projections
        .into_iter()
        .filter_map(|p| position.get(p.id.as_str()).map(|&i| (i, p)))
        .collect();
    ordered.sort_by_key(|(i, _)| *i);
    ordered.into_iter().map(|(_, p)| p).collect()
}

fn side(snapshot: &ResolvedSnapshot) -> SnapshotSide {
    SnapshotSide {
        id: snapshot.id.clone(),
        year: snapshot.year,
        label: snapshot.label.clone(),
        count: snapshot.specs.len(),
    }
}

/// Build the final result from its parts. `cached` is always false here.
pub fn assemble(
    from: &ResolvedSnapshot,
    to: &ResolvedSnapshot,
    delta: &MembershipDelta,
    added_specs: Vec<SpecProjection>,
    removed_specs: Vec<SpecProjection>,
    changed_specs: Vec<ChangedSpec>,
) -> DiffResult {
    DiffResult {
        from: side(from),
        to: side(to),
        summary: DiffSummary {
            added: delta.added.len(),
            removed: delta.removed.len(),
            unchanged: delta.unchanged.len(),
            changed: changed_specs.len(),
        },
        added_specs,
        removed_specs,
        changed_specs,
        cached: false,
    }
}

/// Diff two resolved snapshots entirely in memory.
///
/// Added projections come from `to`'s specs and removed projections from
/// `from`'s specs.
pub fn compute_diff(from: &ResolvedSnapshot, to: &ResolvedSnapshot) -> DiffResult {
    let delta = membership_delta(from, to);
    let changed = detect_changes(from, to, &delta.unchanged);

    let project = |snapshot: &ResolvedSnapshot, ids: &[String]| {
        let by_id = index_specs(snapshot);
        ids.iter()
            .filter_map(|id| by_id.get(id.as_str()).map(|s| s.projection()))
            .collect::<Vec<_>>()
    };
    let added_specs = project(to, &delta.added);
    let removed_specs = project(from, &delta.removed);

    assemble(from, to, &delta, added_specs, removed_specs, changed)
}
