//! Best-effort extraction of file operations from model output.
//!
//! The model is instructed to emit `<FILE path="...">...</FILE>` blocks for
//! writes and self-closing `<DELETE path="..." />` tags for deletes. The
//! response is untrusted text, so parsing never fails: markup that does not
//! match yields fewer (or zero) operations, never an error.

use std::sync::LazyLock;

use regex_lite::Regex;

/// A declarative change to the target tree. Produced only by
/// [`parse_operations`]; consumed exactly once by the applier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    /// Create or overwrite `path` with `content`.
    Write { path: String, content: String },
    /// Remove the file at `path` if present.
    Delete { path: String },
}

impl FileOperation {
    /// Target path, always relative to the target root.
    pub fn path(&self) -> &str {
        match self {
            FileOperation::Write { path, .. } | FileOperation::Delete { path } => path,
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self, FileOperation::Write { .. })
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, FileOperation::Delete { .. })
    }
}

#[expect(clippy::unwrap_used)]
static WRITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<FILE\s+path="([^"]+)">(.*?)</FILE>"#).unwrap());

#[expect(clippy::unwrap_used)]
static DELETE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<DELETE\s+path="([^"]+)"\s*/>"#).unwrap());

/// Extract all file operations from a raw model response.
///
/// All write blocks are collected first (in document order), then all delete
/// tags (in document order); the two kinds are never interleaved in the
/// result. Write content is taken verbatim with surrounding whitespace
/// trimmed. Leading path separators are stripped so paths stay relative.
pub fn parse_operations(response: &str) -> Vec<FileOperation> {
    let mut operations = Vec::new();

    for capture in WRITE_RE.captures_iter(response) {
        operations.push(FileOperation::Write {
            path: normalize_path(&capture[1]),
            content: capture[2].trim().to_string(),
        });
    }

    for capture in DELETE_RE.captures_iter(response) {
        operations.push(FileOperation::Delete {
            path: normalize_path(&capture[1]),
        });
    }

    operations
}

fn normalize_path(path: &str) -> String {
    path.trim_start_matches('/').to_string()
}
