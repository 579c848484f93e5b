//! Immediate-or-deferred results.
//!
//! Middleware results are often a mix of values that are already known and
//! values that resolve later. [`Outcome`] holds either, and its combinators
//! work the same way for both, so a middleware can post-process whatever
//! `next` returned without knowing which kind it got.

use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::{Future, IntoFuture};

/// A value that is either available now or resolves later.
pub enum Outcome<T> {
    /// Already resolved.
    Ready(T),
    /// Resolves when polled to completion.
    Deferred(BoxFuture<'static, T>),
}

impl<T: Send + 'static> Outcome<T> {
    /// Wraps an immediate value.
    #[must_use]
    pub const fn ready(value: T) -> Self {
        Self::Ready(value)
    }

    /// Wraps a future.
    #[must_use]
    pub fn deferred<F>(fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::Deferred(fut.boxed())
    }

    /// Returns true if the value is already available.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Transforms the value once it is available.
    ///
    /// Ready outcomes are transformed immediately and stay ready.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        match self {
            Self::Ready(value) => Outcome::Ready(f(value)),
            Self::Deferred(fut) => Outcome::Deferred(fut.map(f).boxed()),
        }
    }

    /// Chains another outcome-producing step after this one.
    #[must_use]
    pub fn and_then<U, F>(self, f: F) -> Outcome<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Outcome<U> + Send + 'static,
    {
        match self {
            Self::Ready(value) => f(value),
            Self::Deferred(fut) => Outcome::Deferred(async move { f(fut.await).await }.boxed()),
        }
    }

    /// Observes the value without changing it.
    #[must_use]
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&T) + Send + 'static,
    {
        self.map(move |value| {
            f(&value);
            value
        })
    }

    /// Returns the value if it is ready, or the outcome back otherwise.
    pub fn into_ready(self) -> Result<T, Self> {
        match self {
            Self::Ready(value) => Ok(value),
            deferred @ Self::Deferred(_) => Err(deferred),
        }
    }

    /// Resolves the outcome on the current thread.
    ///
    /// Deferred outcomes are driven with a local executor; do not call this
    /// from inside an async runtime.
    pub fn wait(self) -> T {
        match self {
            Self::Ready(value) => value,
            Self::Deferred(fut) => futures::executor::block_on(fut),
        }
    }
}

impl<T: Send + 'static> IntoFuture for Outcome<T> {
    type Output = T;
    type IntoFuture = BoxFuture<'static, T>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Self::Ready(value) => future::ready(value).boxed(),
            Self::Deferred(fut) => fut,
        }
    }
}

impl<T> From<T> for Outcome<T> {
    fn from(value: T) -> Self {
        Self::Ready(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keeps_ready_outcomes_ready() {
        let outcome = Outcome::ready(2).map(|v| v * 10);
        assert!(outcome.is_ready());
        assert_eq!(outcome.into_ready().ok(), Some(20));
    }

    #[test]
    fn test_map_on_deferred_stays_deferred() {
        let outcome = Outcome::deferred(async { 2 }).map(|v| v + 1);
        assert!(!outcome.is_ready());
        assert_eq!(outcome.wait(), 3);
    }

    #[test]
    fn test_and_then_mixes_kinds() {
        let ready_then_deferred =
            Outcome::ready("a".to_string()).and_then(|s| Outcome::deferred(async move { s + "b" }));
        assert_eq!(ready_then_deferred.wait(), "ab");

        let deferred_then_ready =
            Outcome::deferred(async { 1 }).and_then(|v| Outcome::ready(v * 5));
        assert_eq!(deferred_then_ready.wait(), 5);
    }

    #[test]
    fn test_inspect_sees_value() {
        let seen = std::sync::Arc::new(parking_lot::Mutex::new(None));
        let sink = std::sync::Arc::clone(&seen);

        let value = Outcome::ready(7).inspect(move |v| *sink.lock() = Some(*v)).wait();

        assert_eq!(value, 7);
        assert_eq!(*seen.lock(), Some(7));
    }

    #[test]
    fn test_into_ready_returns_deferred_back() {
        let outcome = Outcome::deferred(async { 1 });
        let back = outcome.into_ready().unwrap_err();
        assert_eq!(back.wait(), 1);
    }

    #[tokio::test]
    async fn test_await_either_kind() {
        assert_eq!(Outcome::ready(1).await, 1);
        assert_eq!(Outcome::deferred(async { 2 }).await, 2);
        assert_eq!(Outcome::from(3).await, 3);
    }

    #[test]
    fn test_debug_rendering() {
        assert_eq!(format!("{:?}", Outcome::ready(1)), "Ready(1)");
        assert_eq!(format!("{:?}", Outcome::<i32>::deferred(async { 1 })), "Deferred(..)");
    }
}
