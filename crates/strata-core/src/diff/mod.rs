//! Snapshot diff engine.
//!
//! Compares two resolved reconstruction snapshots and produces the
//! membership delta (added / removed / unchanged spec ids) plus a
//! field-level change report for specs present on both sides.
//!
//! ## Entry points
//!
//! ```ignore
//! use strata_core::diff::engine::compute_diff;
//!
//! let diff = compute_diff(&from_snapshot, &to_snapshot);
//! let summary = strata_core::diff::human_summary::render_human_summary(&diff);
//! ```
//!
//! The orchestrated, cached variant that talks to storage lives in
//! `strata-engine`; this module only holds the pure computation.
//!
//! ## Guarantees
//!
//! - **Determinism**: id lists follow first-occurrence order of the input
//!   references, and `changes` maps are ordered by field path.
//! - **Directionality**: `from`/`to` are never swapped or normalized.
//! - **Nullish normalization**: an absent tracked value is reported as
//!   `null` and is distinct from `0` or an empty string.

pub mod engine;
pub mod fields;
pub mod human_summary;
pub mod model;

pub use engine::{compute_diff, MembershipDelta};
pub use fields::TrackedField;
pub use human_summary::render_human_summary;
pub use model::{ChangedSpec, DiffResult, DiffSummary, FieldChange, SnapshotSide, TrackedValue};
