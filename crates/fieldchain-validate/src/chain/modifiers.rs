use super::ValidationChain;
use crate::rule::{FieldInput, Modifier, RuleFactory};
use fieldchain_core::Request;

impl ValidationChain {
    /// Stop the chain if any validator before this point failed.
    pub fn bail(&self) -> Self {
        self.push(RuleFactory::modifier("bail", |_| Modifier::Bail))
    }

    /// Continue only while `condition` holds for `(request, initial, current)`.
    pub fn when<F>(&self, condition: F) -> Self
    where
        F: Fn(&Request, &str, &str) -> bool + Send + Sync + 'static,
    {
        self.push(RuleFactory::modifier("if", move |input: &FieldInput<'_>| {
            Modifier::If {
                bail: !condition(input.request, input.initial, input.current),
            }
        }))
    }

    /// Invert the outcome of the next step.
    pub fn not(&self) -> Self {
        self.push(RuleFactory::modifier("not", |_| Modifier::Not))
    }

    /// Skip the next step when `predicate` holds.
    pub fn skip<F>(&self, predicate: F) -> Self
    where
        F: Fn(&Request, &str, &str) -> bool + Send + Sync + 'static,
    {
        self.push(RuleFactory::modifier("skip", move |input: &FieldInput<'_>| {
            Modifier::Skip {
                skip: predicate(input.request, input.initial, input.current),
            }
        }))
    }

    /// Stop the chain when the field is absent or empty.
    pub fn optional(&self) -> Self {
        self.push(RuleFactory::modifier("optional", |_| Modifier::Optional))
    }
}
