//! Immutable pipeline configuration.
//!
//! Every component receives its configuration at construction instead of
//! reading ambient globals, so runs (and tests) can substitute different
//! ignore sets, endpoints, and delays. The `Default` impls carry the
//! Convex → Supabase constants the shipped binary uses.

use std::path::PathBuf;
use std::time::Duration;

/// Directory segments never descended into while scanning.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".expo",
    "dist",
    "build",
    ".next",
    "__pycache__",
    ".convex",
    ".cache",
    "android",
    "ios",
];

/// Extensions (binary assets, lockfiles) excluded from scanning.
pub const DEFAULT_IGNORE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "ttf", "otf", "woff", "woff2", "mp4", "mp3", "zip", "tar",
    "gz", "lock",
];

/// Extensions eligible for the migration-candidate predicate.
pub const DEFAULT_CODE_EXTENSIONS: &[&str] =
    &["ts", "tsx", "js", "jsx", "json", "md", "env", "example", "sql"];

/// Literal markers that flag a file as referencing the legacy backend's
/// client API. A heuristic, not a parser.
pub const DEFAULT_LEGACY_MARKERS: &[&str] = &[
    "from 'convex",
    "from \"convex",
    "useQuery",
    "useMutation",
    "useAction",
    "ConvexProvider",
    "ConvexReactClient",
    "api.",
    "convex/",
];

/// Source scanning configuration.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub ignore_dirs: Vec<String>,
    pub ignore_extensions: Vec<String>,
    pub code_extensions: Vec<String>,
    pub legacy_markers: Vec<String>,
    /// Files larger than this are replaced by a sentinel when read.
    pub max_read_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: to_strings(DEFAULT_IGNORE_DIRS),
            ignore_extensions: to_strings(DEFAULT_IGNORE_EXTENSIONS),
            code_extensions: to_strings(DEFAULT_CODE_EXTENSIONS),
            legacy_markers: to_strings(DEFAULT_LEGACY_MARKERS),
            max_read_bytes: 80_000,
        }
    }
}

/// Project-context summary configuration.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Relative paths read in order; missing entries are skipped.
    pub priority_files: Vec<PathBuf>,
    /// Per-file character ceiling before the truncation marker is appended.
    pub per_file_chars: usize,
    /// Hard ceiling on the whole summary.
    pub total_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            priority_files: [
                "package.json",
                "app.json",
                "tsconfig.json",
                "App.tsx",
                "app/_layout.tsx",
                "app/index.tsx",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
            per_file_chars: 2_000,
            total_chars: 4_000,
        }
    }
}

/// Completion endpoint and retry policy configuration.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Low temperature keeps the transformation output deterministic-leaning.
    pub temperature: f32,
    pub request_timeout: Duration,
    /// Attempt budget shared by rate-limit and generic retries.
    pub retries: usize,
    /// HTTP 429 waits `rate_limit_backoff * (attempt + 1)`.
    pub rate_limit_backoff: Duration,
    /// Fixed delay before retrying a non-429 HTTP error.
    pub http_retry_delay: Duration,
    /// Fixed delay before retrying a request timeout.
    pub timeout_retry_delay: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.cursor.sh/v1/chat/completions".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 8_000,
            temperature: 0.1,
            request_timeout: Duration::from_secs(120),
            retries: 3,
            rate_limit_backoff: Duration::from_secs(10),
            http_retry_delay: Duration::from_secs(3),
            timeout_retry_delay: Duration::from_secs(5),
        }
    }
}

/// Two-pass planner configuration.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Top-level directory holding the legacy backend code.
    pub legacy_dir: String,
    /// Project manifest included in the schema-pass prompt.
    pub manifest_file: String,
    /// App manifest included in the schema-pass prompt when present.
    pub app_manifest_file: String,
    /// Migration-candidate files per model request.
    pub batch_size: usize,
    /// Politeness delay between consecutive service calls.
    pub request_delay: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            legacy_dir: "convex".to_string(),
            manifest_file: "package.json".to_string(),
            app_manifest_file: "app.json".to_string(),
            batch_size: 5,
            request_delay: Duration::from_secs(1),
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Written relative to the invocation's working directory.
    pub path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("migration_report.md"),
        }
    }
}

/// Aggregate configuration for one migration run.
#[derive(Debug, Clone, Default)]
pub struct MigrationConfig {
    pub scan: ScanConfig,
    pub context: ContextConfig,
    pub completion: CompletionConfig,
    pub planner: PlannerConfig,
    pub report: ReportConfig,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
