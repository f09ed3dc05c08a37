//! Gateway server loop.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use devport_dispatch::{DispatchChain, DispatchError, Terminal};
use devport_env::Env;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tracing::{error, info};

/// Wrap the axum application as the chain's terminal handler.
///
/// The router is cloned per call; axum routers are cheap to clone and
/// always ready, and their error type is uninhabited.
pub fn router_terminal(router: Router) -> Terminal {
    Arc::new(move |request: Request<Body>| {
        let router = router.clone();
        Box::pin(async move {
            match router.oneshot(request).await {
                Ok(response) => Ok(response),
                Err(infallible) => match infallible {},
            }
        })
    })
}

/// HTTP gateway server.
///
/// Accepts connections, spawns a task per connection, and runs the
/// dispatch chain for each request with the axum router as terminal.
pub struct Gateway {
    bind_addr: SocketAddr,
    chain: Arc<DispatchChain>,
    terminal: Terminal,
    env: Env,
}

impl Gateway {
    pub fn new(bind_addr: SocketAddr, chain: Arc<DispatchChain>, router: Router, env: Env) -> Self {
        Self {
            bind_addr,
            chain,
            terminal: router_terminal(router),
            env,
        }
    }

    /// Start the server.
    ///
    /// Runs until the shutdown signal flips. HTTP/1.1, one tokio task
    /// per connection.
    pub async fn serve(self, mut shutdown: tokio::sync::watch::Receiver<bool>) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.bind_addr)
            .await
            .context("failed to bind gateway")?;

        info!(addr = %self.bind_addr, "gateway listening");

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    let (stream, peer_addr) = accept_result.context("accept failed")?;
                    let chain = self.chain.clone();
                    let terminal = self.terminal.clone();
                    let env = self.env.clone();

                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        let svc = service_fn(move |request: Request<Incoming>| {
                            let chain = chain.clone();
                            let terminal = terminal.clone();
                            let env = env.clone();
                            async move {
                                let request = request.map(Body::new);
                                match chain.run(request, &terminal, &env).await {
                                    Ok(response) => Ok::<_, hyper::Error>(response),
                                    Err(e) => {
                                        error!(%peer_addr, error = %e, "dispatch chain failed");
                                        Ok(failure_response(&e))
                                    }
                                }
                            }
                        });

                        if let Err(e) = http1::Builder::new()
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(%peer_addr, error = %e, "connection error");
                        }
                    });
                }
                _ = shutdown.changed() => {
                    info!("gateway shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Chain failures are server-side by definition; client faults are the
/// terminal router's business and never surface here.
fn failure_response(err: &DispatchError) -> Response<Body> {
    let status = match err {
        DispatchError::UpstreamStream(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let mut response = Response::new(Body::from(format!("dispatch failed: {err}")));
    *response.status_mut() = status;
    response
}
