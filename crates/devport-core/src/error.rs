//! Configuration error types.
//!
//! All of these are startup faults: a configuration that fails to load
//! or validate must prevent the daemon from serving traffic.

use std::path::PathBuf;

use devport_dispatch::PatternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("duplicate profile name {0:?}")]
    DuplicateProfile(String),

    #[error("more than one profile is marked default")]
    MultipleDefaultProfiles,

    #[error("http_port must be nonzero")]
    InvalidPort,
}
