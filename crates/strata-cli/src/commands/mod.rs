pub mod seed;
pub mod snapshot;

/// Default database location for every command
pub const DEFAULT_DB: &str = "strata.db";

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;
