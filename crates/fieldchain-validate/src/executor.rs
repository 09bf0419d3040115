//! Chain execution.
//!
//! One run reads the field once, walks the chain's steps in order and
//! threads three pieces of state between them:
//!
//! - `failed`: validators that failed so far in this run (read by `bail`)
//! - `negate_next`: set by `not`, inverts the next step's validity once
//! - `skip_next`: set by `skip`, drops the next step once
//!
//! Validators see the current sanitized value; recorded errors carry the
//! value as extracted.

use crate::chain::ValidationChain;
use crate::error::{ExtractError, ValidationError};
use crate::extract::extract;
use crate::messages::Messages;
use crate::rule::{Effect, FieldInput, Modifier, Rule};
use crate::store;
use fieldchain_core::Request;
use tracing::{debug, trace, warn};

/// Rule name used for the error recorded when extraction fails.
pub const EXTRACT_RULE: &str = "extract";

/// Result of running one chain against one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome {
    /// Value after every sanitizer that ran
    pub value: String,
    /// Errors recorded by this run, in order
    pub errors: Vec<ValidationError>,
    /// Set when a modifier stopped the chain early
    pub stopped_by: Option<&'static str>,
}

impl ChainOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Default)]
struct RunState {
    failed: usize,
    negate_next: bool,
    skip_next: bool,
}

impl ValidationChain {
    /// Run the chain against `req` and write both per-request stores.
    ///
    /// When the field cannot be extracted, a single error is recorded for it,
    /// no matched value is written, and the extraction error is returned so
    /// the caller can decide whether to reject the request.
    pub fn run(&self, req: &mut Request, messages: &Messages) -> Result<ChainOutcome, ExtractError> {
        let initial = match extract(self.location(), self.field(), req) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    location = %self.location(),
                    field = %self.field(),
                    error = %err,
                    "field extraction failed"
                );
                let message = match self.formatter() {
                    Some(format) => format("", "", EXTRACT_RULE),
                    None => err.to_string(),
                };
                let error = ValidationError::new(self.location(), self.field(), message, "");
                store::append_errors(req, self.location(), self.field(), vec![error]);
                return Err(err);
            }
        };

        let outcome = self.evaluate(req, &initial, messages);

        debug!(
            location = %self.location(),
            field = %self.field(),
            errors = outcome.errors.len(),
            stopped_by = outcome.stopped_by,
            "validation chain finished"
        );

        if !outcome.errors.is_empty() {
            store::append_errors(req, self.location(), self.field(), outcome.errors.clone());
        }
        store::set_value(req, self.location(), self.field(), outcome.value.clone());

        Ok(outcome)
    }

    /// Walk the steps against an already extracted value without touching the
    /// request's stores.
    pub fn evaluate(&self, req: &Request, initial: &str, messages: &Messages) -> ChainOutcome {
        let mut state = RunState::default();
        let mut sanitized = initial.to_string();
        let mut errors = Vec::new();
        let mut stopped_by = None;

        for factory in self.rules() {
            if state.skip_next {
                state.skip_next = false;
                trace!(field = %self.field(), rule = factory.name(), "step skipped");
                continue;
            }

            let input = FieldInput {
                request: req,
                initial,
                current: &sanitized,
            };
            let mut rule = factory.invoke(&input);

            if state.negate_next {
                rule.is_valid = !rule.is_valid;
                state.negate_next = false;
            }

            trace!(
                field = %self.field(),
                rule = rule.name,
                kind = ?rule.kind(),
                valid = rule.is_valid,
                "step evaluated"
            );

            match rule.effect {
                Effect::Validate => {
                    if !rule.is_valid {
                        state.failed += 1;
                        errors.push(self.error_for(&rule, initial, &sanitized, messages));
                    }
                }
                Effect::Sanitize => {
                    if rule.failure.is_some() {
                        state.failed += 1;
                        errors.push(self.error_for(&rule, initial, &sanitized, messages));
                    }
                    sanitized = rule.new_value;
                }
                Effect::Modify(modifier) => {
                    let stop = match modifier {
                        Modifier::Bail => state.failed > 0,
                        Modifier::If { bail } => bail,
                        Modifier::Not => {
                            state.negate_next = true;
                            false
                        }
                        Modifier::Skip { skip } => {
                            state.skip_next = skip;
                            false
                        }
                        Modifier::Optional => initial.is_empty(),
                    };
                    if stop {
                        stopped_by = Some(rule.name);
                        break;
                    }
                }
            }
        }

        ChainOutcome {
            value: sanitized,
            errors,
            stopped_by,
        }
    }

    fn error_for(
        &self,
        rule: &Rule,
        initial: &str,
        sanitized: &str,
        messages: &Messages,
    ) -> ValidationError {
        let message = match self.formatter() {
            Some(format) => format(initial, sanitized, rule.name),
            None => messages.get(rule.name).to_string(),
        };
        ValidationError::new(self.location(), self.field(), message, initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{body, cookie, header, param, query};
    use crate::location::Location;
    use crate::store::ValidationRequestExt;
    use fieldchain_core::TestRequest;
    use proptest::prelude::*;
    use serde_json::json;

    fn post(value: serde_json::Value) -> Request {
        TestRequest::post("/").json(&value).into_request()
    }

    fn eval(chain: &ValidationChain, value: &str) -> ChainOutcome {
        let req = TestRequest::get("/").into_request();
        chain.evaluate(&req, value, &Messages::default())
    }

    #[test]
    fn numeric_check_on_name() {
        let mut req = post(json!({ "name": "John" }));
        let outcome = body("name").is_numeric().run(&mut req, &Messages::default()).unwrap();

        assert_eq!(outcome.errors.len(), 1);
        let errors = req.drain_validation_errors();
        assert_eq!(
            errors,
            vec![ValidationError::new(Location::Body, "name", "Value must be numeric", "John")]
        );
        assert_eq!(
            req.matched_data().unwrap().get(Location::Body, "name"),
            Some("John")
        );
    }

    #[test]
    fn sanitizers_apply_left_to_right() {
        let outcome = eval(&body("name").trim().to_upper_case(), " john ");
        assert_eq!(outcome.value, "JOHN");
        assert!(outcome.is_valid());
    }

    #[test]
    fn whitelist_keeps_class_characters() {
        let outcome = eval(&header("locale").whitelist("a-z"), "en_US");
        assert_eq!(outcome.value, "enUS");
    }

    #[test]
    fn bail_keeps_original_value() {
        let chain = body("name").is_alpha().bail().to_lower_case();

        let failed = eval(&chain, "John1");
        assert_eq!(failed.value, "John1");
        assert_eq!(failed.stopped_by, Some("bail"));
        assert_eq!(failed.errors.len(), 1);

        let passed = eval(&chain, "John");
        assert_eq!(passed.value, "john");
        assert_eq!(passed.stopped_by, None);
    }

    #[test]
    fn bail_only_counts_earlier_validators() {
        let chain = body("n").bail().is_int().is_alpha();
        let outcome = eval(&chain, "x");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.stopped_by, None);
    }

    #[test]
    fn errors_record_original_value_and_see_sanitized() {
        let chain = body("name").trim().is_alpha().is_numeric();
        let outcome = eval(&chain, "  abc ");

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].message, "Value must be numeric");
        assert_eq!(outcome.errors[0].value, "  abc ");
    }

    #[test]
    fn not_inverts_only_the_next_step() {
        let chain = body("v").not().is_empty().is_empty();
        let outcome = eval(&chain, "x");
        assert_eq!(outcome.errors.len(), 1);

        let outcome = eval(&body("v").not().is_numeric(), "42");
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn not_before_sanitizer_is_consumed_without_error() {
        let chain = body("v").not().trim().is_alpha();
        let outcome = eval(&chain, " abc ");
        assert!(outcome.is_valid());
        assert_eq!(outcome.value, "abc");
    }

    #[test]
    fn skip_drops_exactly_one_step() {
        let chain = body("v")
            .skip(|_, _, current| current.is_empty())
            .is_alpha()
            .not_empty();

        let outcome = eval(&chain, "");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].message, "Value is required");

        let outcome = eval(&chain, "abc");
        assert!(outcome.is_valid());
    }

    #[test]
    fn negation_is_consumed_by_a_modifier() {
        let chain = body("v").not().skip(|_, _, _| true).is_alpha().is_int();
        let outcome = eval(&chain, "123");
        assert!(outcome.is_valid());
    }

    #[test]
    fn optional_stops_on_empty_original() {
        let chain = body("nick").optional().is_alpha();
        let empty = eval(&chain, "");
        assert!(empty.is_valid());
        assert_eq!(empty.stopped_by, Some("optional"));

        let present = eval(&chain, "123");
        assert_eq!(present.errors.len(), 1);
    }

    #[test]
    fn optional_looks_at_original_not_sanitized() {
        let chain = body("nick").trim().optional().not_empty();
        let outcome = eval(&chain, "   ");
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn when_stops_if_condition_fails() {
        let chain = body("code")
            .when(|req, _, _| req.headers().contains_key("x-strict"))
            .is_int();

        let lax = eval(&chain, "abc");
        assert!(lax.is_valid());
        assert_eq!(lax.stopped_by, Some("if"));

        let req = TestRequest::get("/").header("x-strict", "1").into_request();
        let strict = chain.evaluate(&req, "abc", &Messages::default());
        assert_eq!(strict.errors.len(), 1);
    }

    #[test]
    fn custom_callbacks_see_both_values() {
        let chain = body("v")
            .trim()
            .custom(|_, initial, current| initial != current);
        assert!(eval(&chain, " a ").is_valid());
        assert_eq!(eval(&chain, "a").errors.len(), 1);
    }

    #[test]
    fn fallible_callbacks_fail_closed() {
        let chain = body("v").try_custom(|_, _, current| current.parse::<u8>().map(|n| n > 10));
        assert!(eval(&chain, "42").is_valid());
        assert_eq!(eval(&chain, "5").errors.len(), 1);
        assert_eq!(eval(&chain, "x").errors.len(), 1);

        let chain = body("v")
            .try_customize(|_, _, current| {
                current
                    .parse::<i32>()
                    .map(|n| (n * 2).to_string())
                    .map_err(|e| e.to_string())
            })
            .bail()
            .to_upper_case();
        let ok = eval(&chain, "21");
        assert_eq!(ok.value, "42");

        let failed = eval(&chain, "abc");
        assert_eq!(failed.value, "abc");
        assert_eq!(failed.errors[0].message, "Value could not be processed");
        assert_eq!(failed.stopped_by, Some("bail"));
    }

    #[test]
    fn formatter_and_registry_messages() {
        let chain = body("age")
            .error_formatter(|initial, sanitized, rule| {
                format!("{} -> {} failed {}", initial, sanitized, rule)
            })
            .trim()
            .is_int();
        let outcome = eval(&chain, " x ");
        assert_eq!(outcome.errors[0].message, " x  -> x failed is_int");

        let messages = Messages::empty().with("is_int", "whole numbers only");
        let req = TestRequest::get("/").into_request();
        let outcome = body("age").is_int().is_float().evaluate(&req, "x", &messages);
        assert_eq!(outcome.errors[0].message, "whole numbers only");
        assert_eq!(outcome.errors[1].message, "Invalid value");
    }

    #[test]
    fn empty_chain_writes_matched_value() {
        let mut req = TestRequest::get("/items?page=3").into_request();
        query("page").run(&mut req, &Messages::default()).unwrap();

        assert!(!req.has_validation_errors());
        assert_eq!(
            req.matched_data().unwrap().get(Location::Query, "page"),
            Some("3")
        );
    }

    #[test]
    fn extraction_failure_is_recorded_per_field() {
        let mut req = TestRequest::post("/")
            .content_type("application/json")
            .body("{broken")
            .path_param("id", "7")
            .into_request();

        let err = body("name").is_alpha().run(&mut req, &Messages::default()).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedBody(_)));

        param("id").is_int().run(&mut req, &Messages::default()).unwrap();

        let data = req.matched_data().unwrap();
        assert_eq!(data.get(Location::Body, "name"), None);
        assert_eq!(data.get(Location::Params, "id"), Some("7"));

        let errors = req.drain_validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].value, "");
        assert!(errors[0].message.starts_with("malformed request body"));
    }

    #[test]
    fn repeated_runs_append() {
        let mut req = TestRequest::get("/").cookie("token", "abc").into_request();
        let chain = cookie("token").is_int();
        chain.run(&mut req, &Messages::default()).unwrap();
        chain.run(&mut req, &Messages::default()).unwrap();
        assert_eq!(req.drain_validation_errors().len(), 2);
    }

    fn validator_pool() -> Vec<ValidationChain> {
        let base = body("v");
        vec![
            base.is_alpha(),
            base.is_numeric(),
            base.is_int(),
            base.is_lowercase(),
            base.not_empty(),
            base.is_length(2, 5),
            base.contains("a"),
        ]
    }

    fn compose(indices: &[usize]) -> ValidationChain {
        let pool = validator_pool();
        indices.iter().fold(body("v"), |chain, &i| {
            chain.push(pool[i].rules()[0].clone())
        })
    }

    proptest! {
        #[test]
        fn validator_order_does_not_change_error_set(
            value in "[a-zA-Z0-9]{0,8}",
            indices in proptest::sample::subsequence((0..7).collect::<Vec<usize>>(), 0..=7),
        ) {
            let mut reversed = indices.clone();
            reversed.reverse();

            let mut forward: Vec<String> = eval(&compose(&indices), &value)
                .errors.into_iter().map(|e| e.message).collect();
            let mut backward: Vec<String> = eval(&compose(&reversed), &value)
                .errors.into_iter().map(|e| e.message).collect();
            forward.sort();
            backward.sort();
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn negation_applies_once(value in "[a-z0-9]{0,6}") {
            let plain = eval(&body("v").is_alpha(), &value).errors.len();
            let negated = eval(&body("v").not().is_alpha(), &value).errors.len();
            prop_assert_eq!(plain + negated, 1);

            let then_plain = eval(&body("v").not().is_alpha().is_alpha(), &value).errors.len();
            prop_assert_eq!(then_plain, 1);
        }

        #[test]
        fn drain_twice_yields_nothing_new(value in "[a-z]{0,4}") {
            let mut req = post(json!({ "v": value }));
            body("v").is_int().run(&mut req, &Messages::default()).unwrap();
            let first = req.drain_validation_errors();
            prop_assert_eq!(first.len(), 1);
            prop_assert!(req.drain_validation_errors().is_empty());
        }
    }
}
