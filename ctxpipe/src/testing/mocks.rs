//! Mock middlewares for testing.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::context::{ContextProvider, ContextStack};
use crate::middleware::{Middleware, Next};

/// An ordered, thread-safe record of events.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Returns a copy of all events.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Returns the number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Clears the log.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// A middleware that records its label, extends the stack and calls `next`.
#[derive(Debug, Clone)]
pub struct RecordingMiddleware {
    label: String,
    log: CallLog,
    providers: Vec<ContextProvider>,
}

impl RecordingMiddleware {
    /// Creates a recording middleware that passes the stack through.
    #[must_use]
    pub fn new(label: impl Into<String>, log: CallLog) -> Self {
        Self {
            label: label.into(),
            log,
            providers: Vec::new(),
        }
    }

    /// Pushes `provider` onto the stack before calling `next`.
    #[must_use]
    pub fn providing(mut self, provider: ContextProvider) -> Self {
        self.providers.push(provider);
        self
    }
}

impl<C: ContextStack, R> Middleware<C, R> for RecordingMiddleware {
    fn handle(&self, ctx: C, next: Next<C, R>) -> R {
        self.log.push(self.label.clone());
        next.run(ctx.with(self.providers.iter().cloned()))
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// A middleware that never calls `next`.
#[derive(Debug, Clone)]
pub struct ShortCircuitMiddleware<R> {
    label: String,
    log: CallLog,
    response: R,
}

impl<R> ShortCircuitMiddleware<R> {
    /// Creates a middleware that records `label` and returns `response`.
    #[must_use]
    pub fn new(label: impl Into<String>, log: CallLog, response: R) -> Self {
        Self {
            label: label.into(),
            log,
            response,
        }
    }
}

impl<C, R> Middleware<C, R> for ShortCircuitMiddleware<R>
where
    R: Clone + Send + Sync,
{
    fn handle(&self, _ctx: C, _next: Next<C, R>) -> R {
        self.log.push(self.label.clone());
        self.response.clone()
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{create_context, ContextConfig, Stack};
    use crate::middleware::compose;

    #[test]
    fn test_call_log_is_shared_between_clones() {
        let log = CallLog::new();
        let other = log.clone();
        other.push("a");

        assert_eq!(log.entries(), vec!["a".to_string()]);
        log.clear();
        assert!(other.is_empty());
    }

    #[test]
    fn test_recording_middleware_extends_stack() {
        let log = CallLog::new();
        let handle = create_context(ContextConfig::new("step"));
        let recorder = RecordingMiddleware::new("one", log.clone())
            .providing(handle.provider.provide("one"));

        let consumer = handle.consumer.clone();
        let seen = Middleware::<Stack, Option<&'static str>>::handle(
            &recorder,
            Stack::new(),
            Next::new(move |stack: Stack| stack.get(&consumer).copied()),
        );

        assert_eq!(seen, Some("one"));
        assert_eq!(log.entries(), vec!["one".to_string()]);
    }

    #[test]
    fn test_short_circuit_skips_terminal() {
        let log = CallLog::new();
        let composed = compose(vec![
            crate::middleware::MiddlewareSlot::new(ShortCircuitMiddleware::new(
                "stop",
                log.clone(),
                "cached",
            )),
            crate::middleware::MiddlewareSlot::new(RecordingMiddleware::new("never", log.clone())),
        ])
        .unwrap();

        let terminal_log = log.clone();
        let result = composed.run(Stack::new(), move |_| {
            terminal_log.push("terminal");
            "fresh"
        });

        assert_eq!(result, "cached");
        assert_eq!(log.entries(), vec!["stop".to_string()]);
    }
}
