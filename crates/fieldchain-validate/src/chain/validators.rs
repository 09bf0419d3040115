use super::ValidationChain;
use crate::rule::{FieldInput, RuleFactory};
use crate::rules::validators as v;
use fieldchain_core::Request;
use regex::Regex;
use std::fmt::Display;

impl ValidationChain {
    fn check_current(&self, name: &'static str, predicate: fn(&str) -> bool) -> Self {
        self.push(RuleFactory::validator(name, move |input| {
            predicate(input.current)
        }))
    }

    /// Value contains `seed`.
    pub fn contains(&self, seed: impl Into<String>) -> Self {
        let seed = seed.into();
        self.push(RuleFactory::validator("contains", move |input| {
            input.current.contains(seed.as_str())
        }))
    }

    /// Value equals `other` exactly.
    pub fn equals(&self, other: impl Into<String>) -> Self {
        let other = other.into();
        self.push(RuleFactory::validator("equals", move |input| {
            input.current == other
        }))
    }

    /// Value matches `pattern` somewhere; anchor the pattern for a full match.
    pub fn matches(&self, pattern: Regex) -> Self {
        self.push(RuleFactory::validator("matches", move |input| {
            pattern.is_match(input.current)
        }))
    }

    pub fn is_alpha(&self) -> Self {
        self.check_current("is_alpha", v::is_alpha)
    }

    pub fn is_numeric(&self) -> Self {
        self.check_current("is_numeric", v::is_numeric)
    }

    pub fn is_alphanumeric(&self) -> Self {
        self.check_current("is_alphanumeric", v::is_alphanumeric)
    }

    pub fn is_int(&self) -> Self {
        self.check_current("is_int", v::is_int)
    }

    pub fn is_float(&self) -> Self {
        self.check_current("is_float", v::is_float)
    }

    pub fn is_boolean(&self) -> Self {
        self.check_current("is_boolean", v::is_boolean)
    }

    pub fn is_email(&self) -> Self {
        self.check_current("is_email", v::is_email)
    }

    pub fn is_url(&self) -> Self {
        self.check_current("is_url", v::is_url)
    }

    pub fn is_ip(&self) -> Self {
        self.check_current("is_ip", v::is_ip)
    }

    pub fn is_uuid(&self) -> Self {
        self.check_current("is_uuid", v::is_uuid)
    }

    pub fn is_hexadecimal(&self) -> Self {
        self.check_current("is_hexadecimal", v::is_hexadecimal)
    }

    pub fn is_lowercase(&self) -> Self {
        self.check_current("is_lowercase", v::is_lowercase)
    }

    pub fn is_uppercase(&self) -> Self {
        self.check_current("is_uppercase", v::is_uppercase)
    }

    pub fn is_ascii(&self) -> Self {
        self.check_current("is_ascii", v::is_ascii)
    }

    /// Value is the empty string.
    pub fn is_empty(&self) -> Self {
        self.check_current("is_empty", v::is_empty)
    }

    /// Value has at least one character.
    pub fn not_empty(&self) -> Self {
        self.check_current("not_empty", |value| !v::is_empty(value))
    }

    /// Length in characters within `min..=max`.
    pub fn is_length(&self, min: usize, max: usize) -> Self {
        self.push(RuleFactory::validator("is_length", move |input| {
            v::is_length(input.current, min, max)
        }))
    }

    /// Value is one of `allowed`.
    pub fn is_in<I, S>(&self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        self.push(RuleFactory::validator("is_in", move |input| {
            allowed.iter().any(|a| a == input.current)
        }))
    }

    /// Custom predicate over `(request, initial, current)`.
    pub fn custom<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Request, &str, &str) -> bool + Send + Sync + 'static,
    {
        self.push(RuleFactory::validator("custom", move |input: &FieldInput<'_>| {
            predicate(input.request, input.initial, input.current)
        }))
    }

    /// Custom predicate that may fail; an `Err` counts as invalid.
    pub fn try_custom<F, E>(&self, predicate: F) -> Self
    where
        F: Fn(&Request, &str, &str) -> Result<bool, E> + Send + Sync + 'static,
        E: Display,
    {
        let field = self.field.clone();
        self.push(RuleFactory::validator("try_custom", move |input: &FieldInput<'_>| {
            match predicate(input.request, input.initial, input.current) {
                Ok(valid) => valid,
                Err(err) => {
                    tracing::warn!(field = %field, error = %err, "custom validator failed");
                    false
                }
            }
        }))
    }
}
