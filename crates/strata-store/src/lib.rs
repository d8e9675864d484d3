//! Strata Store - SQLite persistence for building specs and snapshots
//!
//! Provides:
//! - SQLite schema with an embedded, checksummed migrations framework
//! - Repository layer for specs, snapshots and minimal projections
//! - Snapshot auto-generation from spec filters
//! - YAML seed parser and importer

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod seed;

// Re-export key types
pub use errors::Result;
pub use repo::{AutoGenerateFilter, AutoGenerated, SqliteRepo};
