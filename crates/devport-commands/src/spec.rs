//! Command specifications.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use devport_env::Env;

/// What a command handler produces: a JSON value, or an opaque failure
/// the registry propagates without interpreting.
pub type CommandResult = anyhow::Result<serde_json::Value>;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Handler for verbs without a request body (GET, DELETE).
pub(crate) type PlainHandler = Arc<dyn Fn(Env) -> BoxFuture<CommandResult> + Send + Sync>;

/// Handler for verbs carrying a request body (POST, PUT).
pub(crate) type BodyHandler =
    Arc<dyn Fn(serde_json::Value, Env) -> BoxFuture<CommandResult> + Send + Sync>;

/// A named command with up to one handler per verb.
///
/// Built once at startup. Handlers capture nothing mutable; whatever
/// they need arrives through the explicit [`Env`] argument.
#[derive(Clone)]
pub struct CommandSpec {
    pub(crate) name: String,
    pub(crate) do_get: Option<PlainHandler>,
    pub(crate) do_post: Option<BodyHandler>,
    pub(crate) do_put: Option<BodyHandler>,
    pub(crate) do_delete: Option<PlainHandler>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            do_get: None,
            do_post: None,
            do_put: None,
            do_delete: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn on_get<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Env) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult> + Send + 'static,
    {
        self.do_get = Some(Arc::new(move |env| Box::pin(handler(env))));
        self
    }

    pub fn on_post<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(serde_json::Value, Env) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult> + Send + 'static,
    {
        self.do_post = Some(Arc::new(move |body, env| Box::pin(handler(body, env))));
        self
    }

    pub fn on_put<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(serde_json::Value, Env) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult> + Send + 'static,
    {
        self.do_put = Some(Arc::new(move |body, env| Box::pin(handler(body, env))));
        self
    }

    pub fn on_delete<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Env) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CommandResult> + Send + 'static,
    {
        self.do_delete = Some(Arc::new(move |env| Box::pin(handler(env))));
        self
    }
}
