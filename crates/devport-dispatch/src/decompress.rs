//! Transparent brotli decompression for matched routes.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use devport_env::Env;
use tracing::debug;

use crate::chain::{DispatchStage, Outcome, Terminal};
use crate::error::DispatchResult;
use crate::pattern::UrlPattern;
use crate::transform::{DEFAULT_MAX_BUFFER, maybe_decompress};

/// Decompresses brotli-encoded responses on matched routes, for callers
/// that cannot decode brotli themselves.
///
/// On a pattern match the stage calls through to the terminal, applies
/// [`maybe_decompress`] to whatever comes back, and bypasses with the
/// result. Responses that turn out not to be brotli-encoded keep their
/// streaming body untouched. Unmatched requests continue down the chain.
pub struct DecompressStage {
    patterns: Vec<UrlPattern>,
    max_buffer: usize,
}

impl DecompressStage {
    pub fn new(patterns: Vec<UrlPattern>) -> Self {
        Self {
            patterns,
            max_buffer: DEFAULT_MAX_BUFFER,
        }
    }

    /// Cap the buffered body size for the compressed path.
    pub fn with_max_buffer(mut self, max_buffer: usize) -> Self {
        self.max_buffer = max_buffer;
        self
    }
}

#[async_trait]
impl DispatchStage for DecompressStage {
    fn name(&self) -> &str {
        "brotli-decompress"
    }

    async fn evaluate(
        &self,
        request: Request<Body>,
        terminal: &Terminal,
        _env: &Env,
    ) -> DispatchResult<Outcome> {
        let matched = self
            .patterns
            .iter()
            .any(|p| p.matches(request.method(), request.uri().path()).is_some());
        if !matched {
            return Ok(Outcome::Continue(request));
        }

        debug!(path = request.uri().path(), "route matched, intercepting response");
        let response = terminal(request).await?;
        let response = maybe_decompress(response, self.max_buffer).await?;
        Ok(Outcome::Bypass(response))
    }
}
