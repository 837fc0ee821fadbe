//! Error taxonomy for the migration pipeline.
//!
//! Only the completion client tolerates transient failure (retried
//! internally); everything surfaced here is fatal to the run. Scanner and
//! parser problems never reach this module — they degrade to sentinel text
//! or to an empty operation list instead.

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline result type alias.
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Fatal pipeline errors.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required credential missing from the environment.
    #[error("environment variable {name} is not set")]
    MissingCredential { name: &'static str },

    /// The completion service call exhausted its retry budget.
    #[error("completion service failed after {attempts} attempt(s): {source}")]
    Service {
        attempts: usize,
        #[source]
        source: CompletionError,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to construct HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to copy {path:?}: {source}")]
    CopyFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to delete {path:?}: {source}")]
    DeleteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write report {path:?}: {source}")]
    WriteReport {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Underlying cause of a failed completion call, recorded once the retry
/// budget is spent.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Every attempt was consumed by HTTP 429 responses.
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    /// Non-success HTTP status on the final attempt.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request timed out on the final attempt.
    #[error("request timed out")]
    Timeout,

    /// Transport-level failure (connection refused, TLS, ...). Not retried.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered 2xx but the body was not a usable completion.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}
