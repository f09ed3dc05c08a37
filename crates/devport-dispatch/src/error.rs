//! Error types for the dispatch chain.

use axum::http::{HeaderMap, StatusCode};
use thiserror::Error;

/// Result type alias for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Request-time failures raised by stages, transforms, or the terminal
/// handler. All of these are server-side faults; the chain never maps
/// them to client errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The upstream body stream failed while being drained for a
    /// transform. The partial buffer is discarded.
    #[error("upstream stream failed while draining response body: {0}")]
    UpstreamStream(String),

    /// A buffered body outgrew the configured cap.
    #[error("buffered response body exceeded {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// The drained body could not be decoded. Carries the original
    /// status and headers for diagnostics; the body is gone.
    #[error("failed to decode response body: {reason}")]
    Decode {
        status: StatusCode,
        headers: HeaderMap,
        reason: String,
    },

    /// Failure specific to one stage or terminal handler, propagated
    /// unchanged through the chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
