//! Start-to-finish migration driver.
//!
//! Scan → classify → context → plan (two passes) → apply → report. Strictly
//! sequential: no two service calls are ever in flight at once, and the
//! apply phase runs exactly once at the end.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::apply::{ChangeApplier, RunStats};
use crate::client::CompletionClient;
use crate::config::MigrationConfig;
use crate::context::ContextBuilder;
use crate::error::Result;
use crate::parser::FileOperation;
use crate::planner::MigrationPlanner;
use crate::report::ReportWriter;
use crate::scanner::{SourceFile, SourceScanner};

/// Result of one pipeline run.
#[derive(Debug)]
pub enum Outcome {
    /// Analysis found neither legacy backend files nor candidate files;
    /// nothing was sent to the service and nothing was written.
    NothingToMigrate,
    Completed {
        stats: RunStats,
        operations: Vec<FileOperation>,
        report_path: PathBuf,
    },
}

/// Run the whole migration. `api_key` authenticates against the completion
/// service; `dry_run` skips all target-tree mutation.
pub async fn run(
    config: &MigrationConfig,
    source_root: &Path,
    target_root: &Path,
    dry_run: bool,
    api_key: &str,
) -> Result<Outcome> {
    let scanner = SourceScanner::new(source_root, config.scan.clone());

    info!("analyzing codebase at {}", source_root.display());
    let files = scanner.files();
    let legacy_dir = &config.planner.legacy_dir;
    let legacy_count = files
        .iter()
        .filter(|f| f.in_top_level_dir(legacy_dir))
        .count();
    let candidates = collect_candidates(&scanner, &files);
    info!(
        "{} source file(s), {} under {legacy_dir}/, {} migration candidate(s)",
        files.len(),
        legacy_count,
        candidates.len()
    );

    if legacy_count == 0 && candidates.is_empty() {
        warn!("no {legacy_dir} usage detected; nothing to migrate");
        return Ok(Outcome::NothingToMigrate);
    }

    info!("building project context");
    let context =
        ContextBuilder::new(source_root, &config.context, config.scan.max_read_bytes).build();

    let client = CompletionClient::new(config.completion.clone(), api_key)?;
    let planner = MigrationPlanner::new(&config.planner, &client);
    let operations = planner.plan(&scanner, &files, &candidates, &context).await?;
    info!("{} operation(s) planned in total", operations.len());

    let applier = ChangeApplier::new(&scanner, target_root, legacy_dir);
    let stats = applier.apply(&files, &operations, dry_run)?;
    info!(
        "copied {} written {} deleted {} skipped {}",
        stats.copied, stats.written, stats.deleted, stats.skipped
    );

    let report_path = ReportWriter::new(&config.report).write(
        source_root,
        &operations,
        &stats,
        dry_run,
    )?;
    info!("report written to {}", report_path.display());

    Ok(Outcome::Completed {
        stats,
        operations,
        report_path,
    })
}

/// Migration candidates: code files whose content heuristically references
/// the legacy backend's client API, in discovery (lexicographic) order.
fn collect_candidates(scanner: &SourceScanner, files: &[SourceFile]) -> Vec<SourceFile> {
    files
        .iter()
        .filter(|f| scanner.is_code_file(f) && scanner.references_legacy_backend(&scanner.read_file(f)))
        .cloned()
        .collect()
}
