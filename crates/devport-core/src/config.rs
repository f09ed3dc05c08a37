//! devport.toml configuration parser.
//!
//! Everything here is declarative wiring: ports, directories, auth
//! profiles, dispatch rules, command toggles. Validation happens once
//! at load; a malformed dispatch pattern or duplicate profile aborts
//! startup before any traffic is served.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use devport_dispatch::UrlPattern;
use devport_env::Paths;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub profile: Vec<ProfileConfig>,
    #[serde(default)]
    pub dispatch: Vec<DispatchRule>,
    #[serde(default)]
    pub commands: CommandsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub http_port: u16,
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub projects_dir: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            http_port: 2001,
            data_dir: PathBuf::from("databases"),
            cache_dir: PathBuf::from("system"),
            projects_dir: PathBuf::from("projects"),
        }
    }
}

/// A remote authentication profile. Credential material never lives in
/// the file, only a reference handlers can resolve (provider logic is
/// an external collaborator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    pub remote_host: String,
    pub credentials: Option<String>,
    #[serde(default)]
    pub default: bool,
}

/// One response-decompression rule for the dispatch chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRule {
    pub patterns: Vec<String>,
    /// Cap on the buffered body for matched responses, in bytes.
    pub max_buffer: Option<usize>,
}

impl DispatchRule {
    /// Compile the rule's pattern strings, rejecting malformed ones.
    pub fn compile(&self) -> Result<Vec<UrlPattern>, ConfigError> {
        self.patterns
            .iter()
            .map(|p| UrlPattern::parse(p).map_err(ConfigError::from))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Built-in command names to leave unregistered.
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fail-fast validation, run once before serving.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runtime.http_port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        let mut seen = BTreeSet::new();
        for profile in &self.profile {
            if !seen.insert(profile.name.as_str()) {
                return Err(ConfigError::DuplicateProfile(profile.name.clone()));
            }
        }
        if self.profile.iter().filter(|p| p.default).count() > 1 {
            return Err(ConfigError::MultipleDefaultProfiles);
        }

        for rule in &self.dispatch {
            rule.compile()?;
        }
        Ok(())
    }

    /// The profile marked default, falling back to the first one.
    pub fn default_profile(&self) -> Option<&ProfileConfig> {
        self.profile
            .iter()
            .find(|p| p.default)
            .or_else(|| self.profile.first())
    }

    /// Resolve the configured directories against `base` (the directory
    /// holding the configuration file). Absolute entries win.
    pub fn paths(&self, base: &Path) -> Paths {
        Paths {
            root: base.to_path_buf(),
            data_dir: resolve(base, &self.runtime.data_dir),
            cache_dir: resolve(base, &self.runtime.cache_dir),
            projects_dir: resolve(base, &self.runtime.projects_dir),
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
