//! Validation settings, loadable from `FIELDCHAIN_*` environment variables.
//!
//! ```ignore
//! // FIELDCHAIN_ON_EXTRACTION_ERROR=reject
//! // FIELDCHAIN_REJECT_INVALID=true
//! let config = ValidationConfig::from_env()?;
//! ```

use serde::Deserialize;
use std::fmt;

/// Environment variable prefix for [`ValidationConfig::from_env`].
pub const ENV_PREFIX: &str = "FIELDCHAIN_";

/// What the middleware does when a field cannot be read from the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionErrorPolicy {
    /// Record an error for the field and keep going
    #[default]
    Record,
    /// Answer 400 Bad Request without calling the handler
    Reject,
}

/// Settings shared by every chain in a [`ValidationLayer`](crate::ValidationLayer).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub on_extraction_error: ExtractionErrorPolicy,
    /// Answer 422 with the collected errors instead of calling the handler
    pub reject_invalid: bool,
    /// Message for rules without an entry in the registry
    pub fallback_message: Option<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            on_extraction_error: ExtractionErrorPolicy::Record,
            reject_invalid: false,
            fallback_message: None,
        }
    }
}

impl ValidationConfig {
    /// Load from `FIELDCHAIN_*` environment variables; unset keys keep their
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    /// Load from explicit key/value pairs, using the same names as
    /// [`from_env`](Self::from_env).
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(pairs)?)
    }
}

/// Error type for configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    EnvyError(envy::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvyError(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::EnvyError(e) => Some(e),
        }
    }
}

impl From<envy::Error> for ConfigError {
    fn from(err: envy::Error) -> Self {
        ConfigError::EnvyError(err)
    }
}
