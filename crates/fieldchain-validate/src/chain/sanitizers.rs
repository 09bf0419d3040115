use super::ValidationChain;
use crate::rule::{FieldInput, RuleFactory};
use crate::rules::sanitizers as s;
use fieldchain_core::Request;
use std::fmt::Display;

impl ValidationChain {
    fn map_current(&self, name: &'static str, transform: fn(&str) -> String) -> Self {
        self.push(RuleFactory::sanitizer(name, move |input| {
            transform(input.current)
        }))
    }

    /// Trim whitespace from both ends.
    pub fn trim(&self) -> Self {
        self.map_current("trim", |value| value.trim().to_string())
    }

    pub fn ltrim(&self) -> Self {
        self.map_current("ltrim", |value| value.trim_start().to_string())
    }

    pub fn rtrim(&self) -> Self {
        self.map_current("rtrim", |value| value.trim_end().to_string())
    }

    /// Trim any of `chars` from both ends.
    pub fn trim_chars(&self, chars: impl Into<String>) -> Self {
        let chars = chars.into();
        self.push(RuleFactory::sanitizer("trim_chars", move |input| {
            s::trim_chars(input.current, &chars)
        }))
    }

    pub fn to_lower_case(&self) -> Self {
        self.map_current("to_lower_case", str::to_lowercase)
    }

    pub fn to_upper_case(&self) -> Self {
        self.map_current("to_upper_case", str::to_uppercase)
    }

    /// Escape HTML special characters.
    pub fn escape(&self) -> Self {
        self.map_current("escape", s::escape)
    }

    pub fn unescape(&self) -> Self {
        self.map_current("unescape", s::unescape)
    }

    pub fn strip_tags(&self) -> Self {
        self.map_current("strip_tags", s::strip_tags)
    }

    /// Remove ASCII control characters.
    pub fn strip_low(&self, keep_new_lines: bool) -> Self {
        self.push(RuleFactory::sanitizer("strip_low", move |input| {
            s::strip_low(input.current, keep_new_lines)
        }))
    }

    /// Keep only characters in the class body `chars` (e.g. `"a-z"`),
    /// ignoring ASCII case.
    pub fn whitelist(&self, chars: &str) -> Self {
        let class = s::char_class(chars, true);
        self.push(RuleFactory::sanitizer("whitelist", move |input| {
            s::remove_matches(input.current, &class)
        }))
    }

    /// Remove characters in the class body `chars`, ignoring ASCII case.
    pub fn blacklist(&self, chars: &str) -> Self {
        let class = s::char_class(chars, false);
        self.push(RuleFactory::sanitizer("blacklist", move |input| {
            s::remove_matches(input.current, &class)
        }))
    }

    /// Custom sanitizer over `(request, initial, current)`.
    pub fn customize<F>(&self, transform: F) -> Self
    where
        F: Fn(&Request, &str, &str) -> String + Send + Sync + 'static,
    {
        self.push(RuleFactory::sanitizer("customize", move |input: &FieldInput<'_>| {
            transform(input.request, input.initial, input.current)
        }))
    }

    /// Custom sanitizer that may fail. On `Err` the value is left unchanged
    /// and an error is recorded for the field.
    pub fn try_customize<F, E>(&self, transform: F) -> Self
    where
        F: Fn(&Request, &str, &str) -> Result<String, E> + Send + Sync + 'static,
        E: Display,
    {
        let field = self.field.clone();
        self.push(RuleFactory::fallible_sanitizer(
            "try_customize",
            move |input: &FieldInput<'_>| {
                transform(input.request, input.initial, input.current).map_err(|err| {
                    tracing::warn!(field = %field, error = %err, "custom sanitizer failed");
                    err.to_string()
                })
            },
        ))
    }
}
