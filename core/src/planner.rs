//! Two-pass migration planning.
//!
//! Pass 1 (schema) sends the legacy backend's contents plus the project
//! manifests in one request and asks for the foundation files. Pass 2
//! (file migration) sends the candidate files in fixed-size batches,
//! strictly in discovery order. Operations from both passes are appended
//! into a single ordered sequence — schema operations first, no reordering,
//! no de-duplication — so a later write to the same path simply wins at
//! apply time.

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::client::CompletionClient;
use crate::config::PlannerConfig;
use crate::context::MigrationContext;
use crate::error::Result;
use crate::parser::{FileOperation, parse_operations};
use crate::prompts;
use crate::scanner::{SourceFile, SourceScanner};

/// Split candidates into fixed-size batches, preserving order.
pub fn batches(files: &[SourceFile], size: usize) -> impl Iterator<Item = &[SourceFile]> {
    files.chunks(size.max(1))
}

pub struct MigrationPlanner<'a> {
    config: &'a PlannerConfig,
    client: &'a CompletionClient,
}

impl<'a> MigrationPlanner<'a> {
    pub fn new(config: &'a PlannerConfig, client: &'a CompletionClient) -> Self {
        Self { config, client }
    }

    /// Drive both passes and return the aggregated operation sequence.
    /// A service failure anywhere aborts the whole plan.
    pub async fn plan(
        &self,
        scanner: &SourceScanner,
        files: &[SourceFile],
        candidates: &[SourceFile],
        context: &MigrationContext,
    ) -> Result<Vec<FileOperation>> {
        let mut operations = self.schema_pass(scanner, files).await?;
        sleep(self.config.request_delay).await;

        let migrated = self.migration_pass(scanner, candidates, context).await?;
        operations.extend(migrated);
        Ok(operations)
    }

    /// One large request generating the schema, generated types, client
    /// singleton, example environment file, and updated manifest.
    async fn schema_pass(
        &self,
        scanner: &SourceScanner,
        files: &[SourceFile],
    ) -> Result<Vec<FileOperation>> {
        let legacy_dir = &self.config.legacy_dir;
        info!("generating schema and config from {legacy_dir}/");

        let legacy_backend = if scanner.root().join(legacy_dir).is_dir() {
            let parts: Vec<String> = files
                .iter()
                .filter(|f| f.in_top_level_dir(legacy_dir) && f.extension() == Some("ts"))
                .map(|f| format!("=== {} ===\n{}", f.path.display(), scanner.read_file(f)))
                .collect();
            if parts.is_empty() {
                format!("({legacy_dir}/ is empty)")
            } else {
                parts.join("\n\n")
            }
        } else {
            warn!("no {legacy_dir}/ directory found; schema will be inferred from app code");
            format!("(No {legacy_dir}/ directory found)")
        };

        let package_json = scanner.read_rel(self.config.manifest_file.as_ref());
        let app_manifest_path = scanner.root().join(&self.config.app_manifest_file);
        let app_json = if app_manifest_path.exists() {
            scanner.read_rel(self.config.app_manifest_file.as_ref())
        } else {
            String::new()
        };

        let prompt = prompts::schema_prompt(&package_json, &app_json, &legacy_backend);
        let response = self.client.complete(prompts::SYSTEM_PROMPT, &prompt).await?;
        let operations = parse_operations(&response);
        info!("schema pass produced {} operation(s)", operations.len());
        Ok(operations)
    }

    /// Batched migration of every candidate file, strictly in order, with a
    /// politeness delay after each request.
    async fn migration_pass(
        &self,
        scanner: &SourceScanner,
        candidates: &[SourceFile],
        context: &MigrationContext,
    ) -> Result<Vec<FileOperation>> {
        let mut operations = Vec::new();
        let batch_count = candidates.len().div_ceil(self.config.batch_size.max(1));

        for (index, batch) in batches(candidates, self.config.batch_size).enumerate() {
            info!(
                "batch {}/{}: migrating {} file(s)",
                index + 1,
                batch_count,
                batch.len()
            );

            let files: Vec<String> = batch
                .iter()
                .map(|f| format!("=== {} ===\n{}", f.path.display(), scanner.read_file(f)))
                .collect();
            let prompt = prompts::batch_prompt(context, &files);

            let response = self.client.complete(prompts::SYSTEM_PROMPT, &prompt).await?;
            let batch_operations = parse_operations(&response);
            debug!(
                "batch {} produced {} operation(s)",
                index + 1,
                batch_operations.len()
            );
            operations.extend(batch_operations);

            sleep(self.config.request_delay).await;
        }

        Ok(operations)
    }
}
