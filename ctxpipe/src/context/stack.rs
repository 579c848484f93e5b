//! Immutable, persistent context stacks.

use super::definition::{downcast, ContextId, ContextProvider, ContextValue, Consumer};
use crate::errors::MissingContextError;
use std::fmt;
use std::sync::Arc;

/// One provider plus the chain it was pushed onto.
struct StackEntry {
    provider: ContextProvider,
    parent: Frames,
}

impl StackEntry {
    fn new(provider: ContextProvider, parent: Frames) -> Self {
        Self { provider, parent }
    }
}

impl Drop for StackEntry {
    // Unlink iteratively so dropping a deep chain does not recurse.
    fn drop(&mut self) {
        let mut head = self.parent.head.take();
        while let Some(entry) = head {
            match Arc::try_unwrap(entry) {
                Ok(mut entry) => head = entry.parent.head.take(),
                Err(_) => break,
            }
        }
    }
}

/// Shared chain of stack entries, most recent first.
///
/// Cloning is a pointer copy; extending never touches existing entries.
#[derive(Clone, Default)]
pub struct Frames {
    head: Option<Arc<StackEntry>>,
}

impl Frames {
    /// The empty chain.
    #[must_use]
    pub const fn root() -> Self {
        Self { head: None }
    }

    /// Returns true if no entry has been pushed.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.head.is_none()
    }

    /// Returns true if both chains are the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Number of explicit entries in the chain.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    fn push(&self, provider: ContextProvider) -> Self {
        Self {
            head: Some(Arc::new(StackEntry::new(provider, self.clone()))),
        }
    }

    fn iter(&self) -> FrameIter<'_> {
        FrameIter {
            next: self.head.as_deref(),
        }
    }

    fn find(&self, id: ContextId) -> Option<&ContextProvider> {
        self.iter()
            .map(|entry| &entry.provider)
            .find(|provider| provider.id == id)
    }
}

impl fmt::Debug for Frames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frames")
            .field("depth", &self.depth())
            .finish()
    }
}

struct FrameIter<'a> {
    next: Option<&'a StackEntry>,
}

impl<'a> Iterator for FrameIter<'a> {
    type Item = &'a StackEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.next?;
        self.next = entry.parent.head.as_deref();
        Some(entry)
    }
}

/// An explicit entry as reported by [`ContextStack::debug`].
#[derive(Debug, Clone)]
pub struct DebugEntry {
    id: ContextId,
    name: Arc<str>,
    value: Arc<dyn ContextValue>,
}

impl DebugEntry {
    /// Identity of the definition.
    #[must_use]
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Debug name of the definition.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The provided value.
    #[must_use]
    pub fn value(&self) -> &dyn ContextValue {
        &*self.value
    }

    /// The provided value, if it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        downcast(&*self.value)
    }
}

/// An immutable stack of context providers.
///
/// Implementors hold a [`Frames`] chain and may carry extra state of their
/// own. [`with_frames`](Self::with_frames) builds a new instance of the
/// implementor's own type around an extended chain, so every provided
/// operation returns `Self` rather than a base type.
pub trait ContextStack: Clone + Sized {
    /// Returns an instance with no entries.
    fn create_empty() -> Self;

    /// The chain this stack points at.
    fn frames(&self) -> &Frames;

    /// Builds a stack of the same kind as `self` around `frames`.
    fn with_frames(&self, frames: Frames) -> Self;

    /// Returns a new stack with `providers` pushed in order.
    ///
    /// Later providers shadow earlier ones. With no providers the receiver
    /// is returned unchanged, sharing the same chain.
    #[must_use]
    fn with<I>(&self, providers: I) -> Self
    where
        I: IntoIterator<Item = ContextProvider>,
    {
        let mut providers = providers.into_iter().peekable();
        if providers.peek().is_none() {
            return self.clone();
        }

        let mut frames = self.frames().clone();
        for provider in providers {
            frames = frames.push(provider);
        }
        self.with_frames(frames)
    }

    /// Looks up the most recent value for `consumer`, falling back to its
    /// default.
    fn get<'a, T: ContextValue>(&'a self, consumer: &'a Consumer<T>) -> Option<&'a T> {
        self.frames()
            .find(consumer.id())
            .and_then(|provider| downcast::<T>(&*provider.value))
            .or_else(|| consumer.default_value())
    }

    /// Like [`get`](Self::get), but fails when neither a value nor a default
    /// exists.
    fn get_or_fail<'a, T: ContextValue>(
        &'a self,
        consumer: &'a Consumer<T>,
    ) -> Result<&'a T, MissingContextError> {
        self.get(consumer).ok_or_else(|| {
            tracing::debug!(
                context = consumer.name(),
                id = %consumer.id(),
                "Required context missing"
            );
            MissingContextError::new(consumer.name(), consumer.id())
        })
    }

    /// Returns true only if an explicit entry exists. Defaults do not count.
    fn has<T>(&self, consumer: &Consumer<T>) -> bool {
        self.frames().find(consumer.id()).is_some()
    }

    /// Explicit entries, oldest first.
    fn debug(&self) -> Vec<DebugEntry> {
        let mut entries: Vec<DebugEntry> = self
            .frames()
            .iter()
            .map(|entry| DebugEntry {
                id: entry.provider.id,
                name: Arc::clone(&entry.provider.name),
                value: Arc::clone(&entry.provider.value),
            })
            .collect();
        entries.reverse();
        entries
    }

    /// Number of explicit entries.
    fn depth(&self) -> usize {
        self.frames().depth()
    }

    /// Returns true if both stacks point at the same chain.
    fn same_frames(&self, other: &Self) -> bool {
        self.frames().ptr_eq(other.frames())
    }
}

/// The base context stack.
#[derive(Clone, Default)]
pub struct Stack {
    frames: Frames,
}

impl Stack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::create_empty()
    }
}

impl ContextStack for Stack {
    fn create_empty() -> Self {
        Self {
            frames: Frames::root(),
        }
    }

    fn frames(&self) -> &Frames {
        &self.frames
    }

    fn with_frames(&self, frames: Frames) -> Self {
        Self { frames }
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.debug()
                    .iter()
                    .map(|entry| (entry.name().to_string(), entry.value())),
            )
            .finish()
    }
}
