//! Middleware trait and continuation dispatch.

use std::fmt;
use std::sync::Arc;

/// A continuation-passing processing step.
///
/// A middleware receives the context passed to its continuation and a
/// [`Next`] that advances the chain. It may call `next` and return its
/// result unchanged, post-process that result, or return without calling
/// `next` at all to short-circuit the rest of the chain.
///
/// Any `Fn(C, Next<C, R>) -> R + Send + Sync` closure is a middleware.
pub trait Middleware<C, R>: Send + Sync {
    /// Runs this step.
    fn handle(&self, ctx: C, next: Next<C, R>) -> R;

    /// Name used in logs.
    fn name(&self) -> &str {
        "anonymous"
    }
}

impl<C, R, F> Middleware<C, R> for F
where
    F: Fn(C, Next<C, R>) -> R + Send + Sync,
{
    fn handle(&self, ctx: C, next: Next<C, R>) -> R {
        self(ctx, next)
    }
}

/// Wraps a middleware with a name for logging.
pub struct Named<M> {
    name: String,
    inner: M,
}

impl<M> Named<M> {
    /// Attaches `name` to `inner`.
    #[must_use]
    pub fn new(name: impl Into<String>, inner: M) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

impl<C, R, M> Middleware<C, R> for Named<M>
where
    M: Middleware<C, R>,
{
    fn handle(&self, ctx: C, next: Next<C, R>) -> R {
        self.inner.handle(ctx, next)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub(crate) type Chain<C, R> = Arc<[Arc<dyn Middleware<C, R>>]>;

type Terminal<C, R> = Box<dyn FnOnce(C) -> R + Send>;

/// The continuation handed to a middleware.
///
/// Calling [`run`](Self::run) invokes the following middleware, or the
/// caller-supplied terminal once the chain is exhausted. `run` consumes the
/// continuation and `Next` is not `Clone`, so a step can advance the chain
/// at most once.
pub struct Next<C, R> {
    chain: Chain<C, R>,
    index: usize,
    terminal: Terminal<C, R>,
}

impl<C, R> Next<C, R> {
    /// A continuation that calls `terminal` directly.
    pub fn new<F>(terminal: F) -> Self
    where
        F: FnOnce(C) -> R + Send + 'static,
    {
        Self::chained(Arc::from(Vec::new()), Box::new(terminal))
    }

    pub(crate) fn chained(chain: Chain<C, R>, terminal: Terminal<C, R>) -> Self {
        Self {
            chain,
            index: 0,
            terminal,
        }
    }

    /// Advances the chain with `ctx`.
    pub fn run(self, ctx: C) -> R {
        let Self {
            chain,
            index,
            terminal,
        } = self;

        match chain.get(index).cloned() {
            Some(middleware) => {
                tracing::trace!(index, middleware = middleware.name(), "Dispatching middleware");
                middleware.handle(
                    ctx,
                    Self {
                        chain,
                        index: index + 1,
                        terminal,
                    },
                )
            }
            None => {
                tracing::trace!(index, "Reached terminal continuation");
                terminal(ctx)
            }
        }
    }

    /// Number of middlewares still to run before the terminal.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chain.len().saturating_sub(self.index)
    }
}

impl<C, R> fmt::Debug for Next<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}
