//! Registry for looking up middlewares by name.

use super::chain::{Middleware, Named, Next};
use super::compose::{compose, Composed, MiddlewareSlot};
use crate::errors::InvalidMiddlewareError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Named middlewares that configured pipelines are resolved against.
pub struct MiddlewareRegistry<C, R> {
    entries: RwLock<HashMap<String, Arc<dyn Middleware<C, R>>>>,
}

impl<C, R> Default for MiddlewareRegistry<C, R> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<C: 'static, R: 'static> MiddlewareRegistry<C, R> {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `middleware` under `name`, replacing any previous entry.
    pub fn register<M>(&self, name: impl Into<String>, middleware: M)
    where
        M: Middleware<C, R> + 'static,
    {
        let name = name.into();
        let named: Arc<dyn Middleware<C, R>> = Arc::new(Named::new(name.clone(), middleware));
        self.entries.write().insert(name, named);
    }

    /// Registers a closure under `name`.
    pub fn register_fn<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(C, Next<C, R>) -> R + Send + Sync + 'static,
    {
        self.register(name, f);
    }

    /// Removes the entry for `name`, returning whether one existed.
    pub fn unregister(&self, name: &str) -> bool {
        self.entries.write().remove(name).is_some()
    }

    /// Resolves `name` to a slot. Unknown names give an unresolved slot.
    #[must_use]
    pub fn resolve(&self, name: &str) -> MiddlewareSlot<C, R> {
        self.entries.read().get(name).map_or_else(
            || MiddlewareSlot::unresolved(name),
            |middleware| MiddlewareSlot::shared(Arc::clone(middleware)),
        )
    }

    /// Checks if a middleware is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered middlewares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Resolves each name in order and composes the result.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMiddlewareError` for the first name with no entry.
    pub fn compose_names<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Composed<C, R>, InvalidMiddlewareError> {
        compose(names.iter().map(|name| self.resolve(name.as_ref())))
    }
}
