//! The fluent chain builder.
//!
//! A [`ValidationChain`] names one field at one location and holds the ordered
//! steps to run against it. Builder methods take `&self` and return a new
//! chain with one more step, so a partially built chain can be shared and
//! extended in several directions:
//!
//! ```rust,ignore
//! use fieldchain_validate::chain::body;
//!
//! let name = body("name").trim();
//! let strict = name.is_alpha().bail();
//! let loose = name.is_length(1, 64);
//! assert_eq!(name.rule_count(), 1);
//! ```

mod modifiers;
mod sanitizers;
mod validators;

use crate::location::Location;
use crate::rule::RuleFactory;
use std::fmt;
use std::sync::Arc;

/// Per-field message override: `(initial, sanitized, rule_name) -> message`.
pub type ErrorFormatter = Arc<dyn Fn(&str, &str, &str) -> String + Send + Sync>;

/// An ordered list of steps for one request field.
#[derive(Clone)]
pub struct ValidationChain {
    location: Location,
    field: Arc<str>,
    formatter: Option<ErrorFormatter>,
    rules: Arc<[RuleFactory]>,
}

impl ValidationChain {
    /// An empty chain for `field` at `location`.
    pub fn new(location: Location, field: impl Into<String>) -> Self {
        Self {
            location,
            field: Arc::from(field.into()),
            formatter: None,
            rules: Arc::from(Vec::new()),
        }
    }

    /// Use `formatter` for every error this chain records.
    pub fn error_formatter<F>(&self, formatter: F) -> Self
    where
        F: Fn(&str, &str, &str) -> String + Send + Sync + 'static,
    {
        Self {
            formatter: Some(Arc::new(formatter)),
            ..self.clone()
        }
    }

    /// Append a step, leaving `self` untouched.
    pub fn push(&self, factory: RuleFactory) -> Self {
        let mut rules = Vec::with_capacity(self.rules.len() + 1);
        rules.extend(self.rules.iter().cloned());
        rules.push(factory);
        Self {
            rules: Arc::from(rules),
            ..self.clone()
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn rules(&self) -> &[RuleFactory] {
        &self.rules
    }

    pub(crate) fn formatter(&self) -> Option<&ErrorFormatter> {
        self.formatter.as_ref()
    }

    /// Names of the steps, in order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(RuleFactory::name).collect()
    }

    /// Number of steps.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl fmt::Debug for ValidationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationChain")
            .field("location", &self.location)
            .field("field", &self.field)
            .field("rules", &self.rule_names())
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// Chain for a body field.
pub fn body(field: impl Into<String>) -> ValidationChain {
    ValidationChain::new(Location::Body, field)
}

/// Chain for a query-string field.
pub fn query(field: impl Into<String>) -> ValidationChain {
    ValidationChain::new(Location::Query, field)
}

/// Chain for a path parameter.
pub fn param(field: impl Into<String>) -> ValidationChain {
    ValidationChain::new(Location::Params, field)
}

/// Chain for a header. Header names match case-insensitively.
pub fn header(field: impl Into<String>) -> ValidationChain {
    ValidationChain::new(Location::Headers, field)
}

/// Chain for a cookie.
pub fn cookie(field: impl Into<String>) -> ValidationChain {
    ValidationChain::new(Location::Cookies, field)
}

/// Chain for `field` at an explicit `location`.
pub fn check(location: Location, field: impl Into<String>) -> ValidationChain {
    ValidationChain::new(location, field)
}
