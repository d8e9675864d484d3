//! Strata Engine - Orchestration layer
//!
//! Coordinates the pure diff kernel in `strata-core` with the SQLite store:
//! - [`DiffService`] runs the cached snapshot diff flow
//! - [`SqliteSource`] exposes the store to async callers and implements the
//!   core collaborator traits

pub mod diff_service;
pub mod sqlite_source;

pub use diff_service::{DiffRequest, DiffService};
pub use sqlite_source::{EntityCounts, SqliteSource};
