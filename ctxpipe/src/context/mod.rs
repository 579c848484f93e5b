//! Context definitions and immutable context stacks.
//!
//! This module provides:
//! - Context definitions with unique identities and optional defaults
//! - Type-erased providers that bind values to a definition
//! - Persistent stacks with shadowing lookup and structural sharing

mod definition;
mod stack;

pub use definition::{
    create_context, Consumer, ContextConfig, ContextHandle, ContextId, ContextProvider,
    ContextValue, Provider,
};
pub use stack::{ContextStack, DebugEntry, Frames, Stack};
