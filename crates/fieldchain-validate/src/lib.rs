//! # FieldChain Validation
//!
//! Chainable validation and sanitization of individual request fields.
//! A chain names a field at a location (body, query, path params, headers,
//! cookies) and lists the steps to run against it: validators, sanitizers
//! and flow-control modifiers. Chains are built once and run per request as
//! middleware; failures and final values land in per-request stores that
//! handlers read back.
//!
//! ## Example
//!
//! ```rust,ignore
//! use fieldchain_validate::prelude::*;
//!
//! let layer = ValidationLayer::new()
//!     .chain(body("email").trim().is_email())
//!     .chain(body("name").is_alpha().bail().to_lower_case())
//!     .chain(query("page").optional().is_int());
//!
//! // in the handler
//! let errors = req.drain_validation_errors();
//! let email = req.matched_data()?.get(Location::Body, "email");
//! ```
//!
//! ## Step semantics
//!
//! - validators check the current sanitized value and record an error on
//!   failure
//! - sanitizers replace the current value
//! - `bail()` stops the chain if an earlier validator failed
//! - `when(cond)` stops the chain unless `cond` holds
//! - `not()` inverts the next step once
//! - `skip(pred)` drops the next step once when `pred` holds
//! - `optional()` stops the chain when the field is absent or empty
//!
//! ## Error Format
//!
//! Drained errors serialize as
//!
//! ```json
//! [{"location": "body", "message": "Value must be numeric", "field": "name", "value": "John"}]
//! ```
//!
//! and [`ValidationErrors::into_api_error`] turns them into a 422 response.

pub mod chain;
mod config;
mod error;
mod executor;
mod extract;
mod layer;
mod location;
mod messages;
mod rule;
pub mod rules;
mod store;

pub use chain::{body, check, cookie, header, param, query, ErrorFormatter, ValidationChain};
pub use config::{ConfigError, ExtractionErrorPolicy, ValidationConfig, ENV_PREFIX};
pub use error::{ExtractError, MatchedDataError, ValidationError, ValidationErrors};
pub use executor::{ChainOutcome, EXTRACT_RULE};
pub use extract::extract;
pub use layer::ValidationLayer;
pub use location::Location;
pub use messages::Messages;
pub use rule::{Effect, FieldInput, Modifier, Rule, RuleFactory, RuleKind};
pub use store::{
    append_errors, drain_errors, matched_data, set_value, MatchedData, ValidationRequestExt,
    ValidationResults,
};

/// Prelude module for validation
pub mod prelude {
    pub use crate::chain::{body, check, cookie, header, param, query, ValidationChain};
    pub use crate::error::{ValidationError, ValidationErrors};
    pub use crate::layer::ValidationLayer;
    pub use crate::location::Location;
    pub use crate::messages::Messages;
    pub use crate::store::ValidationRequestExt;
}
