//! Pipeline configuration.
//!
//! A pipeline can be described as data: a name plus an ordered list of
//! middleware names, resolved against a [`MiddlewareRegistry`] at build
//! time.

use crate::errors::CtxpipeError;
use crate::middleware::{Composed, MiddlewareRegistry};
use serde::{Deserialize, Serialize};

/// A named, ordered list of middleware references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    /// Pipeline name, used in logs.
    pub name: String,
    /// Middleware names, outermost first.
    #[serde(default)]
    pub middlewares: Vec<String>,
}

impl PipelineConfig {
    /// Creates a config with no middlewares.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            middlewares: Vec::new(),
        }
    }

    /// Appends a middleware name.
    #[must_use]
    pub fn with_middleware(mut self, name: impl Into<String>) -> Self {
        self.middlewares.push(name.into());
        self
    }

    /// Parses a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CtxpipeError::Config` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, CtxpipeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the config to JSON.
    ///
    /// # Errors
    ///
    /// Returns `CtxpipeError::Config` if serialization fails.
    pub fn to_json(&self) -> Result<String, CtxpipeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Resolves every name against `registry` and composes the chain.
    ///
    /// # Errors
    ///
    /// Returns `CtxpipeError::InvalidMiddleware` for the first unknown name.
    pub fn build<C: 'static, R: 'static>(
        &self,
        registry: &MiddlewareRegistry<C, R>,
    ) -> Result<Composed<C, R>, CtxpipeError> {
        let composed = registry.compose_names(&self.middlewares)?;
        tracing::debug!(
            pipeline = self.name.as_str(),
            len = composed.len(),
            "Built pipeline from config"
        );
        Ok(composed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Next;

    #[test]
    fn test_from_json() {
        let config =
            PipelineConfig::from_json(r#"{"name": "api", "middlewares": ["auth", "log"]}"#)
                .unwrap();

        assert_eq!(
            config,
            PipelineConfig::new("api")
                .with_middleware("auth")
                .with_middleware("log")
        );
    }

    #[test]
    fn test_middlewares_default_to_empty() {
        let config = PipelineConfig::from_json(r#"{"name": "bare"}"#).unwrap();
        assert!(config.middlewares.is_empty());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = PipelineConfig::from_json("{\"name\": 3}").unwrap_err();
        assert!(matches!(err, CtxpipeError::Config(_)));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = PipelineConfig::new("p").with_middleware("a");
        let parsed = PipelineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_build_against_registry() {
        let registry: MiddlewareRegistry<u32, u32> = MiddlewareRegistry::new();
        registry.register_fn("double", |v: u32, next: Next<u32, u32>| next.run(v * 2));

        let ok = PipelineConfig::new("p").with_middleware("double").with_middleware("double");
        assert_eq!(ok.build(&registry).unwrap().run(3, |v| v), 12);

        let bad = PipelineConfig::new("p").with_middleware("double").with_middleware("triple");
        let err = bad.build(&registry).unwrap_err();
        assert!(matches!(err, CtxpipeError::InvalidMiddleware(e) if e.position == 1));
    }
}
