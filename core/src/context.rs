//! Bounded project-context summary shared by every migration prompt.

use std::path::Path;

use crate::config::ContextConfig;
use crate::scanner::read_file_safe;

/// Opaque, size-capped text blob grounding the model in project identity.
/// Built once per run; purely advisory, carries no operation semantics.
#[derive(Debug, Clone)]
pub struct MigrationContext(String);

impl MigrationContext {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Assembles a [`MigrationContext`] from a fixed ordered list of priority
/// project files. Deterministic: same inputs yield the same bytes.
pub struct ContextBuilder<'a> {
    root: &'a Path,
    config: &'a ContextConfig,
    max_read_bytes: u64,
}

impl<'a> ContextBuilder<'a> {
    pub fn new(root: &'a Path, config: &'a ContextConfig, max_read_bytes: u64) -> Self {
        Self {
            root,
            config,
            max_read_bytes,
        }
    }

    pub fn build(&self) -> MigrationContext {
        let mut parts = Vec::new();

        for name in &self.config.priority_files {
            let path = self.root.join(name);
            if !path.is_file() {
                continue;
            }
            let content = read_file_safe(&path, self.max_read_bytes);
            let content = if content.chars().count() > self.config.per_file_chars {
                format!(
                    "{}\n...[truncated]",
                    truncate_chars(&content, self.config.per_file_chars)
                )
            } else {
                content
            };
            parts.push(format!("=== {} ===\n{content}", name.display()));
        }

        let summary = parts.join("\n\n");
        MigrationContext(truncate_chars(&summary, self.config.total_chars).to_string())
    }
}

/// Truncate to at most `max_chars` characters on a char boundary.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
