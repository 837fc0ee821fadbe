//! Migration report rendering and persistence.

use std::path::{Path, PathBuf};

use crate::apply::RunStats;
use crate::config::ReportConfig;
use crate::error::{MigrationError, Result};
use crate::parser::FileOperation;

/// Renders the fixed-structure summary document and persists it at the
/// configured location. The report is part of run completion: a write
/// failure is fatal to the run.
pub struct ReportWriter<'a> {
    config: &'a ReportConfig,
}

impl<'a> ReportWriter<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Render and persist the report, returning its path.
    pub fn write(
        &self,
        source_root: &Path,
        operations: &[FileOperation],
        stats: &RunStats,
        dry_run: bool,
    ) -> Result<PathBuf> {
        let report = self.render(source_root, operations, stats, dry_run);
        std::fs::write(&self.config.path, report).map_err(|source| {
            MigrationError::WriteReport {
                path: self.config.path.clone(),
                source,
            }
        })?;
        Ok(self.config.path.clone())
    }

    /// Render the report document: counts table, itemized created/modified
    /// and deleted paths, and the follow-up checklist.
    pub fn render(
        &self,
        source_root: &Path,
        operations: &[FileOperation],
        stats: &RunStats,
        dry_run: bool,
    ) -> String {
        let mut output = String::new();

        output.push_str("# Migration Report: Convex → Supabase\n\n");
        output.push_str(&format!("**Source:** `{}`\n", source_root.display()));
        output.push_str(&format!("**Dry run:** `{dry_run}`\n\n"));

        output.push_str("## Summary\n\n");
        output.push_str("| Action | Count |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!("| Files copied (unchanged) | {} |\n", stats.copied));
        output.push_str(&format!(
            "| Files written/created by AI | {} |\n",
            stats.written
        ));
        output.push_str(&format!("| Files deleted | {} |\n", stats.deleted));

        output.push_str("\n## Files Created / Modified\n\n");
        for operation in operations.iter().filter(|op| op.is_write()) {
            output.push_str(&format!("- `{}`\n", operation.path()));
        }

        let deleted: Vec<&FileOperation> =
            operations.iter().filter(|op| op.is_delete()).collect();
        if !deleted.is_empty() {
            output.push_str("\n## Files Deleted\n\n");
            for operation in deleted {
                output.push_str(&format!("- `{}`\n", operation.path()));
            }
        }

        output.push_str("\n## Next Steps\n\n");
        output.push_str("1. Create a Supabase project at https://supabase.com\n");
        output.push_str("2. Run `supabase/migrations/001_initial.sql` in the SQL Editor\n");
        output.push_str("3. Copy `.env.example` → `.env` and fill in your Supabase credentials\n");
        output.push_str("4. Run `npm install` then `npx expo start`\n");
        output.push_str("5. Review RLS policies in the migration SQL — tighten as needed\n");

        output
    }
}
