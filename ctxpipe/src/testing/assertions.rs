//! Test assertions for stacks and call logs.

use std::fmt::Debug;

use super::CallLog;
use crate::context::{Consumer, ContextStack, ContextValue};

/// Asserts that the log recorded exactly `expected`, in order.
pub fn assert_log_order(log: &CallLog, expected: &[&str]) {
    let actual = log.entries();
    assert_eq!(
        actual, expected,
        "Expected call order {expected:?}, got {actual:?}"
    );
}

/// Asserts that `stack` has an explicit entry for `consumer` equal to
/// `expected`.
pub fn assert_has_context<S, T>(stack: &S, consumer: &Consumer<T>, expected: &T)
where
    S: ContextStack,
    T: ContextValue + PartialEq + Debug,
{
    assert!(
        stack.has(consumer),
        "Expected context '{}' to be provided, but it isn't",
        consumer.name()
    );
    assert_eq!(
        stack.get(consumer),
        Some(expected),
        "Unexpected value for context '{}'",
        consumer.name()
    );
}

/// Asserts that `get_or_fail` fails for `consumer`.
pub fn assert_missing_context<S, T>(stack: &S, consumer: &Consumer<T>)
where
    S: ContextStack,
    T: ContextValue,
{
    assert!(
        stack.get_or_fail(consumer).is_err(),
        "Expected context '{}' to be missing",
        consumer.name()
    );
}
