//! devport-env — the environment collaborator for DevPort.
//!
//! Handlers and dispatch stages never reach for process-wide globals.
//! Workspace directories, configuration values, and logging all travel
//! through an explicit [`Env`] handle constructed once at startup and
//! cloned cheaply per request.

pub mod error;
pub mod files;
pub mod paths;
pub mod shell;

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::info;

pub use error::EnvError;
pub use files::{read_json, replace_in_file};
pub use paths::Paths;
pub use shell::{CommandOutput, execute_shell};

/// Shared, read-only execution context.
///
/// Built once during configuration, then cloned into every handler and
/// stage invocation. The value map is write-once: mutation after startup
/// is not supported.
#[derive(Debug, Clone)]
pub struct Env {
    paths: Arc<Paths>,
    values: Arc<HashMap<String, serde_json::Value>>,
}

impl Env {
    pub fn new(paths: Paths) -> Self {
        Self {
            paths: Arc::new(paths),
            values: Arc::new(HashMap::new()),
        }
    }

    /// Attach a configuration value under `key`. Startup-time only.
    pub fn with_value(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        Arc::make_mut(&mut self.values).insert(key.into(), value);
        self
    }

    /// Typed lookup of a configuration value.
    ///
    /// Fails with [`EnvError::MissingKey`] when the key is absent and
    /// [`EnvError::Shape`] when the stored value does not deserialize
    /// into the requested type.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, EnvError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| EnvError::MissingKey(key.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|e| EnvError::Shape {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Scoped info log. Emitted inside whatever tracing span the caller
    /// is running under, so command and stage context comes for free.
    pub fn info(&self, text: &str) {
        info!("{text}");
    }

    /// Like [`Env::info`], with a structured data payload.
    pub fn info_with(&self, text: &str, data: &serde_json::Value) {
        info!(data = %data, "{text}");
    }
}
