//! Command registration and verb dispatch.

use std::collections::HashMap;

use devport_env::Env;
use http::Method;
use tracing::debug;

use crate::error::CommandError;
use crate::spec::CommandSpec;

/// Name-keyed command lookup.
///
/// Write-once: commands are registered during startup, the registry is
/// then shared read-only across requests. Dynamic re-registration is
/// intentionally unsupported.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Duplicate names are a configuration fault
    /// and must abort startup.
    pub fn register(&mut self, spec: CommandSpec) -> Result<(), CommandError> {
        if self.commands.contains_key(spec.name()) {
            return Err(CommandError::DuplicateName(spec.name().to_string()));
        }
        debug!(command = spec.name(), "registered command");
        self.commands.insert(spec.name().to_string(), spec);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Registered command names, sorted for stable output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up `name`, dispatch on `method`, and run the bound handler.
    ///
    /// A spec with no handler for the verb is an error, never a silent
    /// no-op. Handler failures propagate verbatim as
    /// [`CommandError::Handler`].
    pub async fn invoke(
        &self,
        name: &str,
        method: &Method,
        body: Option<serde_json::Value>,
        env: Env,
    ) -> Result<serde_json::Value, CommandError> {
        let spec = self
            .commands
            .get(name)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))?;

        let unsupported = || CommandError::MethodNotSupported {
            name: name.to_string(),
            method: method.clone(),
        };

        let future = if *method == Method::GET {
            let handler = spec.do_get.as_ref().ok_or_else(unsupported)?;
            handler(env)
        } else if *method == Method::POST {
            let handler = spec.do_post.as_ref().ok_or_else(unsupported)?;
            handler(body.unwrap_or(serde_json::Value::Null), env)
        } else if *method == Method::PUT {
            let handler = spec.do_put.as_ref().ok_or_else(unsupported)?;
            handler(body.unwrap_or(serde_json::Value::Null), env)
        } else if *method == Method::DELETE {
            let handler = spec.do_delete.as_ref().ok_or_else(unsupported)?;
            handler(env)
        } else {
            return Err(unsupported());
        };

        future.await.map_err(CommandError::Handler)
    }
}
