//! Middleware adapters.
//!
//! A single [`ValidationChain`] is a layer on its own, behaving like a
//! [`ValidationLayer`] holding just that chain: default message registry and
//! default configuration. Use [`ValidationLayer::from_env`] for
//! `FIELDCHAIN_*` settings.

use crate::chain::ValidationChain;
use crate::config::{ConfigError, ExtractionErrorPolicy, ValidationConfig};
use crate::error::ValidationErrors;
use crate::messages::Messages;
use crate::store::ValidationRequestExt;
use fieldchain_core::{ApiError, BoxedFuture, BoxedNext, IntoResponse, MiddlewareLayer, Request};
use std::sync::Arc;
use tracing::debug;

/// Runs a group of chains before the next layer.
///
/// ```rust,ignore
/// use fieldchain_validate::{body, query, ValidationLayer};
///
/// let layer = ValidationLayer::new()
///     .chain(body("email").trim().is_email())
///     .chain(query("page").optional().is_int())
///     .reject_invalid();
/// ```
#[derive(Clone)]
pub struct ValidationLayer {
    chains: Arc<Vec<ValidationChain>>,
    messages: Arc<Messages>,
    config: Arc<ValidationConfig>,
}

impl ValidationLayer {
    pub fn new() -> Self {
        Self {
            chains: Arc::new(Vec::new()),
            messages: Messages::shared(),
            config: Arc::new(ValidationConfig::default()),
        }
    }

    /// A layer configured from `FIELDCHAIN_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new().config(ValidationConfig::from_env()?))
    }

    /// Append a chain. Chains run in the order they are added.
    pub fn chain(mut self, chain: ValidationChain) -> Self {
        Arc::make_mut(&mut self.chains).push(chain);
        self
    }

    /// Append several chains.
    pub fn chains(mut self, chains: impl IntoIterator<Item = ValidationChain>) -> Self {
        Arc::make_mut(&mut self.chains).extend(chains);
        self
    }

    /// Replace the message registry.
    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = Arc::new(messages);
        self.apply_fallback();
        self
    }

    /// Replace the configuration.
    pub fn config(mut self, config: ValidationConfig) -> Self {
        self.config = Arc::new(config);
        self.apply_fallback();
        self
    }

    /// Answer 422 with the collected errors instead of calling the next layer.
    pub fn reject_invalid(mut self) -> Self {
        Arc::make_mut(&mut self.config).reject_invalid = true;
        self
    }

    /// Answer 400 when a field cannot be read from the request.
    pub fn reject_unreadable(mut self) -> Self {
        Arc::make_mut(&mut self.config).on_extraction_error = ExtractionErrorPolicy::Reject;
        self
    }

    pub fn validation_config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn registry(&self) -> &Messages {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    fn apply_fallback(&mut self) {
        if let Some(fallback) = &self.config.fallback_message {
            if self.messages.fallback() != fallback {
                let messages = (*self.messages).clone().with_fallback(fallback.clone());
                self.messages = Arc::new(messages);
            }
        }
    }

    /// Run every chain against `req`.
    ///
    /// Returns the error response to send instead of calling the next layer,
    /// if the configuration asks for one.
    pub fn validate(&self, req: &mut Request) -> Result<(), ApiError> {
        for chain in self.chains.iter() {
            if let Err(err) = chain.run(req, &self.messages) {
                if self.config.on_extraction_error == ExtractionErrorPolicy::Reject {
                    debug!(field = %chain.field(), "rejecting unreadable request");
                    return Err(err.into());
                }
            }
        }

        if self.config.reject_invalid && req.has_validation_errors() {
            let errors = ValidationErrors::from(req.validation_errors());
            debug!(errors = errors.len(), "rejecting invalid request");
            return Err(errors.into_api_error());
        }

        Ok(())
    }
}

impl Default for ValidationLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ValidationChain> for ValidationLayer {
    fn from(chain: ValidationChain) -> Self {
        Self::new().chain(chain)
    }
}

impl FromIterator<ValidationChain> for ValidationLayer {
    fn from_iter<I: IntoIterator<Item = ValidationChain>>(iter: I) -> Self {
        Self::new().chains(iter)
    }
}

impl MiddlewareLayer for ValidationLayer {
    fn call(&self, mut req: Request, next: BoxedNext) -> BoxedFuture {
        match self.validate(&mut req) {
            Ok(()) => next(req),
            Err(err) => Box::pin(async move { err.into_response() }),
        }
    }

    fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
        Box::new(self.clone())
    }
}

impl MiddlewareLayer for ValidationChain {
    fn call(&self, req: Request, next: BoxedNext) -> BoxedFuture {
        ValidationLayer::from(self.clone()).call(req, next)
    }

    fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
        Box::new(self.clone())
    }
}
