//! Error types for the command registry.

use http::Method;
use thiserror::Error;

/// Registration and invocation failures.
///
/// `DuplicateName` is a startup-time configuration fault and must
/// prevent the process from serving traffic. `NotFound` and
/// `MethodNotSupported` are request-time client faults; `Handler`
/// wraps whatever a handler raised, uninterpreted.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("command {0:?} is already registered")]
    DuplicateName(String),

    #[error("command {0:?} is not registered")]
    NotFound(String),

    #[error("command {name:?} has no handler for {method}")]
    MethodNotSupported { name: String, method: Method },

    #[error("command handler failed: {0}")]
    Handler(anyhow::Error),
}
