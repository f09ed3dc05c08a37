//! devport-commands — named, verb-scoped commands for DevPort.
//!
//! A command is an operation addressable by name through the generic
//! execution endpoint, distinct from normal resource routes. Each
//! command binds up to four handlers, one per HTTP verb; GET and DELETE
//! handlers take the environment only, POST and PUT additionally take
//! the request body.
//!
//! The registry is built once at startup and read-only afterwards, so
//! request-time lookup needs no locking.

pub mod builtin;
pub mod error;
pub mod registry;
pub mod spec;

pub use error::CommandError;
pub use registry::CommandRegistry;
pub use spec::{CommandResult, CommandSpec};
