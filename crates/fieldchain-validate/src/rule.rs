//! Rules and rule factories.
//!
//! A [`RuleFactory`] is one step of a chain. At request time it is invoked with
//! the field's values and produces a [`Rule`]: the outcome of that step, which
//! the executor interprets according to its [`Effect`].

use fieldchain_core::Request;
use std::fmt;
use std::sync::Arc;

/// The section of the chain a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Inspects the value and may reject it
    Validator,
    /// Transforms the value, never rejects
    Sanitizer,
    /// Controls the flow of the remaining rules
    Modifier,
}

/// Flow-control instruction carried by a modifier rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Stop the chain if any earlier validator failed
    Bail,
    /// Stop the chain when `bail` is set (the condition did not hold)
    If { bail: bool },
    /// Invert the validity of the next rule
    Not,
    /// Do not invoke the next rule when `skip` is set
    Skip { skip: bool },
    /// Stop the chain when the original value is empty
    Optional,
}

/// How the executor applies a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Validate,
    Sanitize,
    Modify(Modifier),
}

impl Effect {
    pub fn kind(&self) -> RuleKind {
        match self {
            Effect::Validate => RuleKind::Validator,
            Effect::Sanitize => RuleKind::Sanitizer,
            Effect::Modify(_) => RuleKind::Modifier,
        }
    }
}

/// Outcome of evaluating one chain step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Name of the originating rule, used for messages and tracing
    pub name: &'static str,
    /// Predicate result; always `true` for sanitizers and modifiers
    pub is_valid: bool,
    /// Value to carry forward
    pub new_value: String,
    /// How the executor applies this rule
    pub effect: Effect,
    /// Set when a fallible sanitizer callback failed; the value is left as is
    pub failure: Option<String>,
}

impl Rule {
    /// A validator outcome passing `value` through unchanged.
    pub fn validator(name: &'static str, is_valid: bool, value: &str) -> Self {
        Self {
            name,
            is_valid,
            new_value: value.to_string(),
            effect: Effect::Validate,
            failure: None,
        }
    }

    /// A sanitizer outcome carrying the transformed value.
    pub fn sanitizer(name: &'static str, new_value: String) -> Self {
        Self {
            name,
            is_valid: true,
            new_value,
            effect: Effect::Sanitize,
            failure: None,
        }
    }

    /// A sanitizer whose callback failed; `value` is the unchanged input.
    pub fn failed_sanitizer(name: &'static str, value: &str, failure: String) -> Self {
        Self {
            failure: Some(failure),
            ..Self::sanitizer(name, value.to_string())
        }
    }

    /// A modifier outcome passing `value` through unchanged.
    pub fn modifier(name: &'static str, modifier: Modifier, value: &str) -> Self {
        Self {
            name,
            is_valid: true,
            new_value: value.to_string(),
            effect: Effect::Modify(modifier),
            failure: None,
        }
    }

    pub fn kind(&self) -> RuleKind {
        self.effect.kind()
    }
}

/// Values a rule factory is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct FieldInput<'a> {
    /// The request being validated
    pub request: &'a Request,
    /// Value as extracted, before any sanitizer ran
    pub initial: &'a str,
    /// Value after the sanitizers that ran so far
    pub current: &'a str,
}

type BuildFn = dyn Fn(&FieldInput<'_>) -> Rule + Send + Sync;

/// One step of a validation chain.
///
/// Factories are immutable and shared between requests; they only read the
/// [`FieldInput`] they are given.
#[derive(Clone)]
pub struct RuleFactory {
    name: &'static str,
    kind: RuleKind,
    build: Arc<BuildFn>,
}

impl RuleFactory {
    /// A validator step: `predicate` sees the current sanitized value.
    pub fn validator<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&FieldInput<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            name,
            kind: RuleKind::Validator,
            build: Arc::new(move |input: &FieldInput<'_>| {
                Rule::validator(name, predicate(input), input.current)
            }),
        }
    }

    /// A sanitizer step: `transform` returns the new value.
    pub fn sanitizer<F>(name: &'static str, transform: F) -> Self
    where
        F: Fn(&FieldInput<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            name,
            kind: RuleKind::Sanitizer,
            build: Arc::new(move |input: &FieldInput<'_>| Rule::sanitizer(name, transform(input))),
        }
    }

    /// A sanitizer step whose transform may fail.
    pub fn fallible_sanitizer<F>(name: &'static str, transform: F) -> Self
    where
        F: Fn(&FieldInput<'_>) -> Result<String, String> + Send + Sync + 'static,
    {
        Self {
            name,
            kind: RuleKind::Sanitizer,
            build: Arc::new(move |input: &FieldInput<'_>| match transform(input) {
                Ok(value) => Rule::sanitizer(name, value),
                Err(failure) => Rule::failed_sanitizer(name, input.current, failure),
            }),
        }
    }

    /// A modifier step: `control` decides the flow instruction.
    pub fn modifier<F>(name: &'static str, control: F) -> Self
    where
        F: Fn(&FieldInput<'_>) -> Modifier + Send + Sync + 'static,
    {
        Self {
            name,
            kind: RuleKind::Modifier,
            build: Arc::new(move |input: &FieldInput<'_>| {
                Rule::modifier(name, control(input), input.current)
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Evaluate this step.
    pub fn invoke(&self, input: &FieldInput<'_>) -> Rule {
        (self.build)(input)
    }
}

impl fmt::Debug for RuleFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleFactory")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}
