//! Error types for the environment collaborator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from environment lookups and workspace utilities.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("environment key {0:?} is not set")]
    MissingKey(String),

    #[error("environment key {key:?} has an unexpected shape: {reason}")]
    Shape { key: String, reason: String },

    #[error("shell command exited with status {status}: {stderr}")]
    Shell { status: i32, stderr: String },

    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
