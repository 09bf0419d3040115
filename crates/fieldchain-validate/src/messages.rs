//! Default error messages, keyed by rule name.
//!
//! A [`Messages`] registry is handed to the executor explicitly, so an
//! application (or a test) can swap the table without touching shared state.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

const FALLBACK: &str = "Invalid value";

static SHARED_DEFAULT: OnceLock<Arc<Messages>> = OnceLock::new();

const DEFAULTS: &[(&str, &str)] = &[
    ("contains", "Value must contain the required text"),
    ("equals", "Value does not match the expected value"),
    ("matches", "Value does not match the required pattern"),
    ("is_alpha", "Value must contain only letters"),
    ("is_numeric", "Value must be numeric"),
    ("is_alphanumeric", "Value must contain only letters and numbers"),
    ("is_int", "Value must be an integer"),
    ("is_float", "Value must be a number"),
    ("is_boolean", "Value must be a boolean"),
    ("is_email", "Invalid email format"),
    ("is_url", "Invalid URL"),
    ("is_ip", "Invalid IP address"),
    ("is_uuid", "Invalid UUID"),
    ("is_hexadecimal", "Value must be hexadecimal"),
    ("is_lowercase", "Value must be lowercase"),
    ("is_uppercase", "Value must be uppercase"),
    ("is_ascii", "Value must contain only ASCII characters"),
    ("is_empty", "Value must be empty"),
    ("not_empty", "Value is required"),
    ("is_length", "Value has an invalid length"),
    ("is_in", "Value is not one of the allowed values"),
    ("custom", "Invalid value"),
    ("try_custom", "Invalid value"),
    ("try_customize", "Value could not be processed"),
];

/// Rule name → default message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    table: HashMap<String, String>,
    fallback: String,
}

impl Messages {
    /// A registry with no entries; every rule gets the fallback.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
            fallback: FALLBACK.to_string(),
        }
    }

    /// Override (or add) the message for `rule`.
    pub fn with(mut self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        self.table.insert(rule.into(), message.into());
        self
    }

    /// Replace the message used for rules without an entry.
    pub fn with_fallback(mut self, message: impl Into<String>) -> Self {
        self.fallback = message.into();
        self
    }

    /// Message for `rule`, or the fallback.
    pub fn get(&self, rule: &str) -> &str {
        self.table
            .get(rule)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// The default registry, built once and shared.
    pub fn shared() -> Arc<Messages> {
        SHARED_DEFAULT
            .get_or_init(|| Arc::new(Messages::default()))
            .clone()
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            table: DEFAULTS
                .iter()
                .map(|(rule, message)| (rule.to_string(), message.to_string()))
                .collect(),
            fallback: FALLBACK.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_builtin_rules() {
        let messages = Messages::default();
        assert_eq!(messages.get("is_email"), "Invalid email format");
        assert_eq!(messages.get("no_such_rule"), "Invalid value");
    }

    #[test]
    fn overrides_do_not_leak_between_registries() {
        let custom = Messages::default()
            .with("is_email", "Bad email")
            .with_fallback("Nope");

        assert_eq!(custom.get("is_email"), "Bad email");
        assert_eq!(custom.get("unknown"), "Nope");
        assert_eq!(Messages::default().get("is_email"), "Invalid email format");
        assert_eq!(Messages::empty().get("is_email"), "Invalid value");
        assert_eq!(Messages::shared().get("is_email"), "Invalid email format");
    }
}
