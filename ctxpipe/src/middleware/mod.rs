//! Continuation-passing middleware and composition.
//!
//! A middleware has the shape `(ctx, next) -> result`. [`compose`] folds an
//! ordered list of them into a single middleware of the same shape, so
//! composed chains nest freely.

mod chain;
mod compose;
mod registry;

pub use chain::{Middleware, Named, Next};
pub use compose::{compose, Composed, MiddlewareSlot};
pub use registry::MiddlewareRegistry;
