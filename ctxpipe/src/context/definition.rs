//! Context definitions, consumers and providers.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a context definition.
///
/// Every call to [`create_context`] allocates a fresh id, so two definitions
/// never compare equal even when their names collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric id.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}

/// A value that can be carried on a context stack.
///
/// Implemented for every `Debug + Send + Sync + 'static` type.
pub trait ContextValue: Any + fmt::Debug + Send + Sync {
    /// Returns `self` as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug + Send + Sync> ContextValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Definition<T> {
    id: ContextId,
    name: Arc<str>,
    default_value: Option<T>,
}

/// Configuration for [`create_context`].
#[derive(Debug, Clone)]
pub struct ContextConfig<T> {
    name: String,
    default_value: Option<T>,
}

impl<T> ContextConfig<T> {
    /// Creates a config with a debug name and no default.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: None,
        }
    }

    /// Sets the default value returned when nothing was provided.
    #[must_use]
    pub fn with_default(mut self, value: T) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// Read handle for one context definition.
///
/// Only used as a lookup key against a stack.
pub struct Consumer<T> {
    definition: Arc<Definition<T>>,
}

impl<T> Consumer<T> {
    /// Returns the definition identity.
    #[must_use]
    pub fn id(&self) -> ContextId {
        self.definition.id
    }

    /// Returns the debug name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Returns the default value, if one was configured.
    #[must_use]
    pub fn default_value(&self) -> Option<&T> {
        self.definition.default_value.as_ref()
    }
}

impl<T> Clone for Consumer<T> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
        }
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("id", &self.definition.id)
            .field("name", &self.definition.name)
            .finish()
    }
}

/// Value-binding factory for one context definition.
pub struct Provider<T> {
    definition: Arc<Definition<T>>,
}

impl<T: ContextValue> Provider<T> {
    /// Binds `value` to this definition.
    ///
    /// The returned token is meant to be handed straight to
    /// [`ContextStack::with`](super::ContextStack::with).
    #[must_use]
    pub fn provide(&self, value: T) -> ContextProvider {
        ContextProvider {
            id: self.definition.id,
            name: Arc::clone(&self.definition.name),
            value: Arc::new(value),
        }
    }
}

impl<T> Provider<T> {
    /// Returns the definition identity.
    #[must_use]
    pub fn id(&self) -> ContextId {
        self.definition.id
    }
}

impl<T> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
        }
    }
}

impl<T> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("id", &self.definition.id)
            .field("name", &self.definition.name)
            .finish()
    }
}

/// A value bound to a definition identity, ready to be pushed on a stack.
///
/// The value type is erased so one `with` call can mix definitions.
#[derive(Debug, Clone)]
pub struct ContextProvider {
    pub(crate) id: ContextId,
    pub(crate) name: Arc<str>,
    pub(crate) value: Arc<dyn ContextValue>,
}

impl ContextProvider {
    /// Returns the identity this value is bound to.
    #[must_use]
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Returns the debug name of the definition.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The pair returned by [`create_context`].
pub struct ContextHandle<T> {
    /// Lookup key.
    pub consumer: Consumer<T>,
    /// Value-binding factory.
    pub provider: Provider<T>,
}

impl<T> Clone for ContextHandle<T> {
    fn clone(&self) -> Self {
        Self {
            consumer: self.consumer.clone(),
            provider: self.provider.clone(),
        }
    }
}

impl<T> fmt::Debug for ContextHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandle")
            .field("consumer", &self.consumer)
            .finish_non_exhaustive()
    }
}

/// Creates a new context definition.
///
/// A fresh identity is allocated on every call. The name is only used for
/// debugging and error messages.
#[must_use]
pub fn create_context<T: ContextValue>(config: ContextConfig<T>) -> ContextHandle<T> {
    let definition = Arc::new(Definition {
        id: ContextId::next(),
        name: Arc::from(config.name),
        default_value: config.default_value,
    });

    ContextHandle {
        consumer: Consumer {
            definition: Arc::clone(&definition),
        },
        provider: Provider { definition },
    }
}

pub(crate) fn downcast<T: 'static>(value: &dyn ContextValue) -> Option<&T> {
    value.as_any().downcast_ref::<T>()
}
