//! # Ctxpipe
//!
//! Two composable primitives for request and command processing pipelines:
//!
//! - **Context stacks**: immutable, identity-keyed stacks that let a chain of
//!   steps read and extend shared state without mutation or cross-talk
//!   between independent runs
//! - **Middleware composition**: folding an ordered list of
//!   continuation-passing steps into one step of the same shape
//!
//! ## Quick Start
//!
//! ```rust
//! use ctxpipe::prelude::*;
//!
//! let user = create_context(ContextConfig::<String>::new("user"));
//! let greeting = create_context(ContextConfig::new("greeting").with_default("Hello"));
//!
//! let provider = user.provider.clone();
//! let authenticate = MiddlewareSlot::from_fn(move |ctx: Stack, next: Next<Stack, Outcome<String>>| {
//!     next.run(ctx.with([provider.provide("ada".to_string())]))
//! });
//!
//! let pipeline = compose(vec![authenticate]).expect("all middlewares are callable");
//!
//! let out = pipeline.run(Stack::new(), move |ctx| {
//!     let name = ctx.get_or_fail(&user.consumer).expect("authenticated");
//!     let greeting = ctx.get(&greeting.consumer).copied().unwrap_or_default();
//!     Outcome::ready(format!("{greeting}, {name}"))
//! });
//!
//! assert_eq!(out.wait(), "Hello, ada");
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod context;
pub mod errors;
pub mod middleware;
pub mod outcome;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::context::{
        create_context, Consumer, ContextConfig, ContextHandle, ContextId, ContextProvider,
        ContextStack, DebugEntry, Frames, Provider, Stack,
    };
    pub use crate::errors::{CtxpipeError, InvalidMiddlewareError, MissingContextError};
    pub use crate::middleware::{
        compose, Composed, Middleware, MiddlewareRegistry, MiddlewareSlot, Named, Next,
    };
    pub use crate::outcome::Outcome;
}
