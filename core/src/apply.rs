//! Materializing the target tree.
//!
//! Live mode runs in two strictly ordered steps: a bulk copy of every
//! scanned file (the legacy backend subtree is never copied — it is deleted
//! by omission), then the planned operations in sequence. All copies happen
//! before any generated write or delete, so generated content wins every
//! path collision. Filesystem failures here are fatal; there is no partial
//! rollback.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{MigrationError, Result};
use crate::parser::FileOperation;
use crate::scanner::{SourceFile, SourceScanner};

/// Counters accumulated during one apply pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Files copied unchanged from source to target.
    pub copied: usize,
    /// Files created or overwritten by planned operations.
    pub written: usize,
    /// Files removed by planned operations.
    pub deleted: usize,
    /// Delete operations whose target was already absent.
    pub skipped: usize,
}

/// Applies a planned operation sequence to the target tree. The target tree
/// is exclusively owned by the run for its duration.
pub struct ChangeApplier<'a> {
    scanner: &'a SourceScanner,
    target_root: &'a Path,
    legacy_dir: &'a str,
}

impl<'a> ChangeApplier<'a> {
    pub fn new(scanner: &'a SourceScanner, target_root: &'a Path, legacy_dir: &'a str) -> Self {
        Self {
            scanner,
            target_root,
            legacy_dir,
        }
    }

    /// Copy the source tree (minus the legacy backend directory) into the
    /// target, then apply `operations` in order. In dry-run mode nothing is
    /// touched; the stats only count what the plan would do.
    pub fn apply(
        &self,
        files: &[SourceFile],
        operations: &[FileOperation],
        dry_run: bool,
    ) -> Result<RunStats> {
        let mut stats = RunStats::default();

        if dry_run {
            stats.written = operations.iter().filter(|op| op.is_write()).count();
            stats.deleted = operations.iter().filter(|op| op.is_delete()).count();
            info!("[dry run] skipping file writes");
            return Ok(stats);
        }

        info!(
            "copying source to target (excluding {}/)",
            self.legacy_dir
        );
        for file in files {
            if file.in_top_level_dir(self.legacy_dir) {
                continue;
            }
            let src = self.scanner.root().join(&file.path);
            let dest = self.target_root.join(&file.path);
            create_parent_dirs(&dest)?;
            fs::copy(&src, &dest).map_err(|source| MigrationError::CopyFile {
                path: file.path.clone(),
                source,
            })?;
            stats.copied += 1;
        }

        info!("applying {} generated operation(s)", operations.len());
        for operation in operations {
            match operation {
                FileOperation::Write { path, content } => {
                    if Path::new(path).starts_with(self.legacy_dir) {
                        // Allowed, just unusual: re-creates a path under the
                        // otherwise-omitted legacy subtree.
                        debug!("write resurrects legacy path {path}");
                    }
                    let dest = self.target_root.join(path);
                    create_parent_dirs(&dest)?;
                    fs::write(&dest, content).map_err(|source| MigrationError::WriteFile {
                        path: dest.clone(),
                        source,
                    })?;
                    stats.written += 1;
                }
                FileOperation::Delete { path } => {
                    let dest = self.target_root.join(path);
                    if dest.exists() {
                        fs::remove_file(&dest).map_err(|source| MigrationError::DeleteFile {
                            path: dest.clone(),
                            source,
                        })?;
                        stats.deleted += 1;
                    } else {
                        stats.skipped += 1;
                    }
                }
            }
        }

        Ok(stats)
    }
}

fn create_parent_dirs(dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|source| MigrationError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
