//! Command-line front end for the replatforming pipeline.
//!
//! Designed for non-interactive use (e.g. a CI job): all inputs come from
//! arguments and the environment, and the process runs start-to-finish
//! without prompting.

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use replat_core::client::API_KEY_ENV;
use replat_core::config::MigrationConfig;
use replat_core::error::MigrationError;
use replat_core::pipeline::{self, Outcome};

/// Convex → Supabase migration agent.
#[derive(Debug, Parser)]
#[command(name = "replat", version, about = "Port a Convex-backed Expo app to Supabase")]
pub struct Cli {
    /// Path to the cloned source repo.
    #[arg(long)]
    pub source: PathBuf,

    /// Path to the cloned target repo.
    #[arg(long)]
    pub target: PathBuf,

    /// If true, analyze only and don't write files.
    #[arg(long = "dry-run", default_value = "false", value_parser = ["true", "false"])]
    pub dry_run: String,
}

/// Run the pipeline for the parsed arguments. Exits are mapped by the
/// caller: any error is a non-zero exit; a zero-work run is a success.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let api_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or(MigrationError::MissingCredential { name: API_KEY_ENV })?;

    let dry_run = cli.dry_run == "true";
    info!("source: {}", cli.source.display());
    info!("target: {}", cli.target.display());
    info!("dry run: {dry_run}");

    let config = MigrationConfig::default();
    match pipeline::run(&config, &cli.source, &cli.target, dry_run, &api_key).await? {
        Outcome::NothingToMigrate => {
            warn!("no Convex usage detected; nothing to migrate");
        }
        Outcome::Completed { stats, report_path, .. } => {
            info!(
                "finished: copied {} written {} deleted {} skipped {}",
                stats.copied, stats.written, stats.deleted, stats.skipped
            );
            info!("report: {}", report_path.display());
            if dry_run {
                info!("(dry run: no files were written to the target repo)");
            }
        }
    }
    Ok(())
}
