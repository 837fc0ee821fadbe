//! Source tree scanning and file classification.
//!
//! Walks the source root in a deterministic order, applies the ignore rules,
//! and exposes the content heuristics used to decide which files are sent to
//! the model. The scanner never mutates the source tree and never fails a
//! run: unreadable or oversized files degrade to sentinel text.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::ScanConfig;

/// Prefix of the sentinel substituted for oversized file content.
pub const TOO_LARGE_SENTINEL_PREFIX: &str = "[FILE TOO LARGE:";

/// A file discovered under the source root.
///
/// Identity is the path relative to the root; content is read lazily through
/// [`SourceScanner::read_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the source root.
    pub path: PathBuf,
    /// Size in bytes at discovery time.
    pub size: u64,
}

impl SourceFile {
    /// File extension without the leading dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|ext| ext.to_str())
    }

    /// True if the first path segment equals `dir`.
    pub fn in_top_level_dir(&self, dir: &str) -> bool {
        self.path
            .components()
            .next()
            .is_some_and(|c| c.as_os_str() == std::ffi::OsStr::new(dir))
    }
}

/// Deterministic, ignore-aware enumeration of a source tree.
pub struct SourceScanner {
    root: PathBuf,
    config: ScanConfig,
}

impl SourceScanner {
    pub fn new(root: impl Into<PathBuf>, config: ScanConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate all relevant files, sorted lexicographically by relative
    /// path. Ignored directories are pruned during descent; unreadable
    /// entries are skipped.
    pub fn files(&self) -> Vec<SourceFile> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir() && self.is_ignored_dir_name(entry.file_name()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping unreadable entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let file = SourceFile {
                path: rel.to_path_buf(),
                size: entry.metadata().map(|m| m.len()).unwrap_or(0),
            };
            if self.has_ignored_extension(&file) {
                continue;
            }
            files.push(file);
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    /// Read a discovered file's content, substituting sentinels for
    /// oversized or unreadable files.
    pub fn read_file(&self, file: &SourceFile) -> String {
        self.read_rel(&file.path)
    }

    /// Read a path relative to the root with the same sentinel semantics.
    pub fn read_rel(&self, rel: &Path) -> String {
        read_file_safe(&self.root.join(rel), self.config.max_read_bytes)
    }

    /// Heuristic: does this content appear to reference the legacy backend's
    /// client API? The oversize sentinel never matches.
    pub fn references_legacy_backend(&self, content: &str) -> bool {
        if content.starts_with(TOO_LARGE_SENTINEL_PREFIX) {
            return false;
        }
        self.config
            .legacy_markers
            .iter()
            .any(|marker| content.contains(marker.as_str()))
    }

    /// True if the file's extension is in the configured code set, i.e. the
    /// file is eligible for the migration-candidate predicate.
    pub fn is_code_file(&self, file: &SourceFile) -> bool {
        file.extension()
            .is_some_and(|ext| self.config.code_extensions.iter().any(|c| c == ext))
    }

    fn is_ignored_dir_name(&self, name: &std::ffi::OsStr) -> bool {
        name.to_str()
            .is_some_and(|name| self.config.ignore_dirs.iter().any(|d| d == name))
    }

    fn has_ignored_extension(&self, file: &SourceFile) -> bool {
        file.extension()
            .is_some_and(|ext| self.config.ignore_extensions.iter().any(|i| i == ext))
    }
}

/// Read `path`, truncating to a sentinel if it exceeds `max_bytes` and
/// substituting an error sentinel if it cannot be read. Invalid UTF-8 is
/// replaced rather than rejected.
pub fn read_file_safe(path: &Path, max_bytes: u64) -> String {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > max_bytes => {
            format!("[FILE TOO LARGE: {} bytes, skipped]", meta.len())
        }
        Ok(_) => match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => format!("[ERROR READING: {err}]"),
        },
        Err(err) => format!("[ERROR READING: {err}]"),
    }
}
