//! Testing utilities for context stacks and middleware chains.
//!
//! This module provides:
//! - A thread-safe call log for recording execution order
//! - Recording and short-circuiting middlewares
//! - Assertions over stacks and logs

mod assertions;
mod mocks;

pub use assertions::{assert_has_context, assert_log_order, assert_missing_context};
pub use mocks::{CallLog, RecordingMiddleware, ShortCircuitMiddleware};
