//! Repository layer
//!
//! [`SqliteRepo`] is a namespace of stateless operations over a
//! `rusqlite::Connection`; its methods are spread across one file per entity.

mod auto_generate;
mod snapshots;
mod specs;

pub use auto_generate::{AutoGenerateFilter, AutoGenerated};

/// SQLite repository for building specs and reconstruction snapshots
pub struct SqliteRepo;
