//! Seed import system
//!
//! Provides:
//! - Seed format (schema version 1)
//! - YAML parser with validation
//! - Digest canonicalization
//! - Importer orchestration

pub mod digest;
pub mod format;
pub mod importer;
pub mod parser;

pub use digest::compute_seed_digest;
pub use format::{SeedFile, SEED_SCHEMA_VERSION};
pub use importer::{import_seed, import_seed_str, SeedImportSummary};
pub use parser::{
    parse_seed_file, parse_seed_file_with_db, parse_seed_str, parse_seed_str_with_db,
};
