//! Admin API handlers.
//!
//! Command invocations run inside a tracing span carrying the command
//! name and verb; the span closes on every exit path.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use devport_commands::CommandError;
use tracing::{Instrument, error, info_span};

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

/// GET /healthz
pub async fn health() -> impl IntoResponse {
    ApiResponse::ok(serde_json::json!({ "status": "up" }))
}

/// GET /admin/environment
pub async fn environment(State(state): State<ApiState>) -> impl IntoResponse {
    let paths = state.env.paths();
    let profiles: Vec<String> = state.env.get("profiles").unwrap_or_default();
    let default_profile: Option<String> = state.env.get("default_profile").ok();
    ApiResponse::ok(serde_json::json!({
        "data_dir": paths.data_dir.clone(),
        "cache_dir": paths.cache_dir.clone(),
        "projects_dir": paths.projects_dir.clone(),
        "profiles": profiles,
        "default_profile": default_profile,
        "commands": state.registry.names(),
    }))
}

/// Any verb on /admin/commands/{name}
///
/// The registry decides whether the verb is supported; unknown commands
/// map to 404, unbound verbs to 405, handler failures to 500.
pub async fn run_command(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    method: Method,
    body: Bytes,
) -> axum::response::Response {
    let body = if body.is_empty() {
        None
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => Some(value),
            Err(e) => {
                return error_response(
                    &format!("invalid JSON body: {e}"),
                    StatusCode::BAD_REQUEST,
                )
                .into_response();
            }
        }
    };

    let span = info_span!("command", command = %name, verb = %method);
    let result = state
        .registry
        .invoke(&name, &method, body, state.env.clone())
        .instrument(span)
        .await;

    match result {
        Ok(value) => ApiResponse::ok(value).into_response(),
        Err(e @ CommandError::NotFound(_)) => {
            error_response(&e.to_string(), StatusCode::NOT_FOUND).into_response()
        }
        Err(e @ CommandError::MethodNotSupported { .. }) => {
            error_response(&e.to_string(), StatusCode::METHOD_NOT_ALLOWED).into_response()
        }
        Err(e) => {
            error!(command = %name, error = %e, "command failed");
            error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}
