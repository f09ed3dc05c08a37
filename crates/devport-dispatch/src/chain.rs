//! Dispatch chain execution.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use devport_env::Env;
use tracing::{Instrument, debug};

use crate::error::DispatchResult;

/// Boxed future returned by terminal handlers.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Handle to the normal application routing. Invoked by the runner when
/// no stage bypasses, or by a stage that wants the response itself.
pub type Terminal =
    Arc<dyn Fn(Request<Body>) -> BoxFuture<DispatchResult<Response<Body>>> + Send + Sync>;

/// A stage's verdict on one request.
pub enum Outcome {
    /// Not handled; the request is handed back for the next stage.
    /// Bodies are single-pass, so ownership moves through the chain.
    Continue(Request<Body>),
    /// The final response. No further stage is evaluated.
    Bypass(Response<Body>),
}

/// One unit in the dispatch chain.
///
/// Stages hold only immutable configuration captured at construction.
/// A stage that needs the response for a request it matched calls
/// `terminal` itself and transforms the result before bypassing; the
/// chain never re-processes responses through earlier stages.
#[async_trait]
pub trait DispatchStage: Send + Sync {
    /// Stage name, used for the per-evaluation tracing span.
    fn name(&self) -> &str;

    /// Inspect the request and either defer or produce the final
    /// response. Failures propagate unchanged through the chain.
    async fn evaluate(
        &self,
        request: Request<Body>,
        terminal: &Terminal,
        env: &Env,
    ) -> DispatchResult<Outcome>;
}

/// Ordered list of dispatch stages evaluated ahead of normal routing.
pub struct DispatchChain {
    stages: Vec<Arc<dyn DispatchStage>>,
}

impl DispatchChain {
    pub fn new(stages: Vec<Arc<dyn DispatchStage>>) -> Self {
        Self { stages }
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Evaluate stages strictly in configured order.
    ///
    /// The first stage to bypass wins and later stages never run. If
    /// every stage defers, the terminal handler produces the response.
    /// The runner neither swallows nor retries failures; a stage or
    /// terminal error surfaces to the caller as-is.
    pub async fn run(
        &self,
        request: Request<Body>,
        terminal: &Terminal,
        env: &Env,
    ) -> DispatchResult<Response<Body>> {
        let mut request = request;
        for stage in &self.stages {
            let span = tracing::debug_span!("dispatch_stage", stage = stage.name());
            match stage.evaluate(request, terminal, env).instrument(span).await? {
                Outcome::Continue(deferred) => request = deferred,
                Outcome::Bypass(response) => {
                    debug!(stage = stage.name(), "dispatch stage bypassed routing");
                    return Ok(response);
                }
            }
        }
        terminal(request).await
    }
}
