//! devport-api — admin surface of the DevPort runtime.
//!
//! Provides axum route handlers for the generic command-execution
//! endpoint and read-only environment inspection.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET/POST/PUT/DELETE | `/admin/commands/{name}` | Invoke a named command |
//! | GET | `/admin/environment` | Workspace paths and profiles |
//! | GET | `/healthz` | Liveness |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{any, get};
use devport_commands::CommandRegistry;
use devport_env::Env;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<CommandRegistry>,
    pub env: Env,
}

/// Build the admin router.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/admin/environment", get(handlers::environment))
        .route("/admin/commands/{name}", any(handlers::run_command))
        .with_state(state)
}
