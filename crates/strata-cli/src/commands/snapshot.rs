//! Snapshot commands: list, show, diff, auto-generate

use clap::{Args, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use strata_core::cache::shared_diff_cache;
use strata_core::diff::render_human_summary;
use strata_core::errors::StrataError;
use strata_core::model::SpecStatus;
use strata_core::source::SnapshotResolver;
use strata_engine::{DiffService, SqliteSource};
use strata_store::AutoGenerateFilter;

use super::{CommandResult, DEFAULT_DB};

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub command: SnapshotCommand,
}

#[derive(Debug, Subcommand)]
pub enum SnapshotCommand {
    /// List stored snapshots, optionally for a single year
    List(ListArgs),
    /// Print a snapshot with its building specs as JSON
    Show(ShowArgs),
    /// Compare two snapshots
    Diff(DiffArgs),
    /// Create a snapshot from the specs matching a filter
    AutoGenerate(AutoGenerateArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long, default_value = DEFAULT_DB)]
    pub db: PathBuf,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,

    #[arg(long, default_value = DEFAULT_DB)]
    pub db: PathBuf,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    #[arg(long)]
    pub from: String,

    #[arg(long)]
    pub to: String,

    /// Print the raw diff JSON instead of the Markdown summary
    #[arg(long)]
    pub json: bool,

    #[arg(long, default_value = DEFAULT_DB)]
    pub db: PathBuf,
}

#[derive(Debug, Args)]
pub struct AutoGenerateArgs {
    #[arg(long)]
    pub year: i32,

    /// Case-insensitive architectural style substring
    #[arg(long)]
    pub style: Option<String>,

    #[arg(long)]
    pub status: Option<SpecStatus>,

    /// Cutoff year; defaults to --year
    #[arg(long)]
    pub before_year: Option<i32>,

    #[arg(long)]
    pub label: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, default_value = DEFAULT_DB)]
    pub db: PathBuf,
}

pub async fn execute(args: SnapshotArgs) -> CommandResult {
    match args.command {
        SnapshotCommand::List(list_args) => execute_list(list_args).await,
        SnapshotCommand::Show(show_args) => execute_show(show_args).await,
        SnapshotCommand::Diff(diff_args) => execute_diff(diff_args).await,
        SnapshotCommand::AutoGenerate(gen_args) => execute_auto_generate(gen_args).await,
    }
}

async fn execute_list(args: ListArgs) -> CommandResult {
    let source = SqliteSource::open(&args.db)?;
    let snapshots = source.list_snapshots(args.year).await?;

    if snapshots.is_empty() {
        println!("No snapshots found");
        return Ok(());
    }

    for snapshot in snapshots {
        println!(
            "{}\t{}\t{}\t{} specs",
            snapshot.id,
            snapshot.year,
            snapshot.label.as_deref().unwrap_or("-"),
            snapshot.spec_refs.len()
        );
    }
    Ok(())
}

async fn execute_show(args: ShowArgs) -> CommandResult {
    let source = SqliteSource::open(&args.db)?;
    let snapshot = source
        .resolve(&args.id)
        .await?
        .ok_or(StrataError::SnapshotNotFound {
            snapshot_id: args.id,
        })?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

async fn execute_diff(args: DiffArgs) -> CommandResult {
    let source = Arc::new(SqliteSource::open(&args.db)?);
    let service = DiffService::new(
        source.clone(),
        source,
        shared_diff_cache(NonZeroUsize::MIN),
    );

    let diff = service.diff(&args.from, &args.to).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    } else {
        print!("{}", render_human_summary(&diff));
    }
    Ok(())
}

async fn execute_auto_generate(args: AutoGenerateArgs) -> CommandResult {
    let source = SqliteSource::open(&args.db)?;

    let filter = AutoGenerateFilter {
        year: args.year,
        style: args.style,
        status: args.status,
        before_year: args.before_year,
        label: args.label,
        description: args.description,
    };
    let generated = source.auto_generate(filter).await?;

    println!(
        "✓ Created snapshot {} with {} specs",
        generated.id, generated.count
    );
    Ok(())
}
