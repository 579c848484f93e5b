//! Error types for ctxpipe.
//!
//! Two failure signals exist: a middleware slot that cannot be called,
//! detected while composing, and a required context value that was never
//! provided, detected while looking it up.

use crate::context::ContextId;
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for ctxpipe operations.
#[derive(Debug, Error)]
pub enum CtxpipeError {
    /// A middleware list contained an entry that is not callable.
    #[error("{0}")]
    InvalidMiddleware(#[from] InvalidMiddlewareError),

    /// A required context value was looked up but never provided.
    #[error("{0}")]
    MissingContext(#[from] MissingContextError),

    /// A pipeline configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CtxpipeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Error raised by `compose` when a slot is not callable.
///
/// The composed middleware is never built when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid middleware at position {position}: '{label}' is not callable")]
pub struct InvalidMiddlewareError {
    /// Zero-based index of the offending slot.
    pub position: usize,
    /// Label of the unresolved slot.
    pub label: String,
}

impl InvalidMiddlewareError {
    /// Creates a new invalid middleware error.
    #[must_use]
    pub fn new(position: usize, label: impl Into<String>) -> Self {
        Self {
            position,
            label: label.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("InvalidMiddleware"));
        map.insert("position".to_string(), serde_json::json!(self.position));
        map.insert("label".to_string(), serde_json::json!(self.label));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Error raised by `get_or_fail` when no value and no default exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required context: '{name}' ({id})")]
pub struct MissingContextError {
    /// Debug name of the context definition.
    pub name: String,
    /// Identity of the context definition.
    pub id: ContextId,
}

impl MissingContextError {
    /// Creates a new missing context error.
    #[must_use]
    pub fn new(name: impl Into<String>, id: ContextId) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("MissingContext"));
        map.insert("name".to_string(), serde_json::json!(self.name));
        map.insert("id".to_string(), serde_json::json!(self.id.to_string()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}
