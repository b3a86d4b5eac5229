//! Handler objects invoked once a command's arguments are bound and its
//! checks have passed.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::context::CommandContext;

/// A boxed, pinned future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An application-level failure reported by a command handler.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

pub type HandlerResult = Result<(), HandlerError>;

/// The application code behind a command.
pub trait CommandHandler: Send + Sync {
    fn invoke(&self, ctx: Arc<CommandContext>) -> BoxFuture<'static, HandlerResult>;
}

/// Wrapper turning an async closure into a [`CommandHandler`] object.
struct HandlerFn<F> {
    f: F,
}

impl<F, Fut> CommandHandler for HandlerFn<F>
where
    F: Fn(Arc<CommandContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn invoke(&self, ctx: Arc<CommandContext>) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self.f)(ctx))
    }
}

/// Converts an async function into a boxed handler.
///
/// ```rust,ignore
/// let handler = handler_fn(|ctx| async move {
///     let user: &String = ctx.arguments().get("user").unwrap();
///     println!("banning {user}");
///     Ok(())
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn CommandHandler>
where
    F: Fn(Arc<CommandContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(HandlerFn { f })
}
