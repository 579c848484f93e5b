//! Folding an ordered middleware list into one middleware.

use super::chain::{Chain, Middleware, Named, Next};
use crate::errors::InvalidMiddlewareError;
use std::fmt;
use std::sync::Arc;

/// One position in a middleware list handed to [`compose`].
///
/// A slot is either a callable middleware or an unresolved reference, such
/// as a configured name with nothing registered under it.
pub enum MiddlewareSlot<C, R> {
    /// A callable middleware.
    Ready(Arc<dyn Middleware<C, R>>),
    /// A reference that could not be resolved to a middleware.
    Unresolved {
        /// What the slot referred to.
        label: String,
    },
}

impl<C, R> MiddlewareSlot<C, R> {
    /// Wraps a middleware.
    pub fn new<M>(middleware: M) -> Self
    where
        M: Middleware<C, R> + 'static,
    {
        Self::Ready(Arc::new(middleware))
    }

    /// Wraps a closure of shape `(ctx, next) -> result`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(C, Next<C, R>) -> R + Send + Sync + 'static,
    {
        Self::Ready(Arc::new(f))
    }

    /// Wraps a middleware under a name.
    pub fn named<M>(name: impl Into<String>, middleware: M) -> Self
    where
        M: Middleware<C, R> + 'static,
    {
        Self::Ready(Arc::new(Named::new(name, middleware)))
    }

    /// Wraps an already shared middleware.
    #[must_use]
    pub fn shared(middleware: Arc<dyn Middleware<C, R>>) -> Self {
        Self::Ready(middleware)
    }

    /// A slot that is not callable.
    #[must_use]
    pub fn unresolved(label: impl Into<String>) -> Self {
        Self::Unresolved {
            label: label.into(),
        }
    }

    /// Returns true if the slot holds a middleware.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The middleware name, or the unresolved label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Ready(middleware) => middleware.name(),
            Self::Unresolved { label } => label,
        }
    }
}

impl<C, R> From<Arc<dyn Middleware<C, R>>> for MiddlewareSlot<C, R> {
    fn from(middleware: Arc<dyn Middleware<C, R>>) -> Self {
        Self::Ready(middleware)
    }
}

impl<C: 'static, R: 'static> From<Composed<C, R>> for MiddlewareSlot<C, R> {
    fn from(composed: Composed<C, R>) -> Self {
        Self::new(composed)
    }
}

impl<C, R> fmt::Debug for MiddlewareSlot<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(middleware) => f.debug_tuple("Ready").field(&middleware.name()).finish(),
            Self::Unresolved { label } => f
                .debug_struct("Unresolved")
                .field("label", label)
                .finish(),
        }
    }
}

/// An ordered middleware chain folded into a single middleware.
///
/// `Composed` is itself a [`Middleware`], so it can be placed in another
/// `compose` call. Cloning shares the chain.
pub struct Composed<C, R> {
    chain: Chain<C, R>,
}

impl<C, R> Composed<C, R> {
    /// Runs the chain with `ctx`, ending in `terminal`.
    ///
    /// The result is whatever the first middleware (or `terminal`, for an
    /// empty chain) returns. Nothing is awaited or unwrapped here.
    pub fn run<F>(&self, ctx: C, terminal: F) -> R
    where
        F: FnOnce(C) -> R + Send + 'static,
    {
        Next::chained(Arc::clone(&self.chain), Box::new(terminal)).run(ctx)
    }

    /// Number of middlewares in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns true if the chain has no middlewares.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Names of the middlewares, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.chain.iter().map(|middleware| middleware.name()).collect()
    }
}

impl<C, R> Clone for Composed<C, R> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
        }
    }
}

impl<C, R> fmt::Debug for Composed<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composed")
            .field("middlewares", &self.names())
            .finish()
    }
}

impl<C: 'static, R: 'static> Middleware<C, R> for Composed<C, R> {
    fn handle(&self, ctx: C, next: Next<C, R>) -> R {
        self.run(ctx, move |ctx| next.run(ctx))
    }

    fn name(&self) -> &str {
        "composed"
    }
}

/// Folds `slots` into one middleware.
///
/// Every slot is checked before anything is built: the first unresolved slot
/// fails the whole call with its position.
///
/// # Errors
///
/// Returns `InvalidMiddlewareError` if any slot is not callable.
pub fn compose<C, R, I>(slots: I) -> Result<Composed<C, R>, InvalidMiddlewareError>
where
    I: IntoIterator<Item = MiddlewareSlot<C, R>>,
{
    let mut chain: Vec<Arc<dyn Middleware<C, R>>> = Vec::new();

    for (position, slot) in slots.into_iter().enumerate() {
        match slot {
            MiddlewareSlot::Ready(middleware) => chain.push(middleware),
            MiddlewareSlot::Unresolved { label } => {
                tracing::warn!(position, label = label.as_str(), "Rejecting unresolved middleware");
                return Err(InvalidMiddlewareError::new(position, label));
            }
        }
    }

    tracing::debug!(
        len = chain.len(),
        middlewares = ?chain.iter().map(|m| m.name()).collect::<Vec<_>>(),
        "Composed middleware chain"
    );

    Ok(Composed {
        chain: Arc::from(chain),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type Step = MiddlewareSlot<i32, i32>;

    fn add(n: i32) -> Step {
        MiddlewareSlot::from_fn(move |v: i32, next: Next<i32, i32>| next.run(v + n))
    }

    #[test]
    fn test_compose_runs_in_order() {
        let trail = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let slots: Vec<Step> = (1..=3)
            .map(|i| {
                let trail = Arc::clone(&trail);
                MiddlewareSlot::from_fn(move |v: i32, next: Next<i32, i32>| {
                    trail.lock().push(i);
                    next.run(v)
                })
            })
            .collect();

        let composed = compose(slots).unwrap();
        assert_eq!(composed.run(0, |v| v), 0);
        assert_eq!(*trail.lock(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_compose_calls_terminal() {
        let composed = compose(Vec::<Step>::new()).unwrap();
        assert!(composed.is_empty());
        assert_eq!(composed.run(4, |v| v * 3), 12);
    }

    #[test]
    fn test_unresolved_slot_fails_with_position() {
        let err = compose(vec![add(1), Step::unresolved("audit"), Step::unresolved("later")])
            .unwrap_err();

        assert_eq!(err.position, 1);
        assert_eq!(err.label, "audit");
    }

    #[test]
    fn test_short_circuit_skips_rest() {
        let composed = compose(vec![
            add(1),
            MiddlewareSlot::from_fn(|v: i32, _next: Next<i32, i32>| -v),
            add(100),
        ])
        .unwrap();

        assert_eq!(composed.run(1, |_| unreachable!("terminal must not run")), -2);
    }

    #[test]
    fn test_post_processing_sees_inner_result() {
        let composed = compose(vec![
            MiddlewareSlot::from_fn(|v: i32, next: Next<i32, i32>| next.run(v) * 10),
            add(2),
        ])
        .unwrap();

        assert_eq!(composed.run(1, |v| v), 30);
    }

    #[test]
    fn test_nested_compose_matches_flat() {
        let nested = compose(vec![
            compose(vec![add(1), MiddlewareSlot::from_fn(|v: i32, next: Next<i32, i32>| next.run(v * 2))])
                .unwrap()
                .into(),
            add(3),
        ])
        .unwrap();

        let flat = compose(vec![
            add(1),
            MiddlewareSlot::from_fn(|v: i32, next: Next<i32, i32>| next.run(v * 2)),
            add(3),
        ])
        .unwrap();

        assert_eq!(nested.run(5, |v| v), flat.run(5, |v| v));
        assert_eq!(nested.run(5, |v| v), 15);
    }

    #[test]
    fn test_names_and_labels() {
        let composed = compose(vec![
            MiddlewareSlot::named("auth", |v: i32, next: Next<i32, i32>| next.run(v)),
            add(1),
        ])
        .unwrap();

        assert_eq!(composed.names(), vec!["auth", "anonymous"]);
        assert_eq!(Step::unresolved("gone").label(), "gone");
        assert!(!Step::unresolved("gone").is_callable());
        assert_eq!(MiddlewareSlot::from(composed).label(), "composed");
    }
}
