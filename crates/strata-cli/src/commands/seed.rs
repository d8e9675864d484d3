//! Seed import command
//!
//! Usage: strata seed import <PATH> [--db <FILE>]

use clap::{Args, Subcommand};
use std::path::PathBuf;
use strata_engine::SqliteSource;

use super::{CommandResult, DEFAULT_DB};

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Import a seed file into the database
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to seed YAML file or directory
    pub path: PathBuf,

    #[arg(long, default_value = DEFAULT_DB)]
    pub db: PathBuf,
}

pub async fn execute(args: SeedArgs) -> CommandResult {
    match args.command {
        SeedCommand::Import(import_args) => execute_import(import_args).await,
    }
}

async fn execute_import(args: ImportArgs) -> CommandResult {
    let source = SqliteSource::open(&args.db)?;

    let seed_files = if args.path.is_dir() {
        // Sorted for a deterministic import order
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    } else {
        vec![args.path]
    };

    for seed_file in seed_files {
        println!("Importing {}...", seed_file.display());
        let summary = source.import_seed(seed_file).await?;
        println!(
            "✓ Imported {} specs, {} snapshots (digest: {})",
            summary.specs, summary.snapshots, summary.seed_digest
        );
    }

    Ok(())
}
