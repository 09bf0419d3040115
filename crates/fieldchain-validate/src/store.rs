//! Per-request result and matched-data stores.
//!
//! Both stores are typed values in the request's extensions, created on first
//! write and dropped with the request. Nothing here is shared across requests.

use crate::error::{MatchedDataError, ValidationError};
use crate::location::Location;
use fieldchain_core::Request;
use serde::Serialize;
use std::collections::BTreeMap;

/// Validation errors recorded for a request: location → field → errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResults {
    entries: BTreeMap<Location, BTreeMap<String, Vec<ValidationError>>>,
}

impl ValidationResults {
    /// Append `errors` to the list kept for `field`.
    pub fn append(&mut self, location: Location, field: &str, errors: Vec<ValidationError>) {
        self.entries
            .entry(location)
            .or_default()
            .entry(field.to_string())
            .or_default()
            .extend(errors);
    }

    /// Errors for one field, in record order.
    pub fn get(&self, location: Location, field: &str) -> &[ValidationError] {
        self.entries
            .get(&location)
            .and_then(|fields| fields.get(field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All errors, ordered by location, then field name, then record order.
    pub fn flatten(&self) -> Vec<ValidationError> {
        self.entries
            .values()
            .flat_map(|fields| fields.values())
            .flat_map(|errors| errors.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(|fields| fields.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Final sanitized values for a request: location → field → value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchedData {
    values: BTreeMap<Location, BTreeMap<String, String>>,
}

impl MatchedData {
    /// Record `value` for `field`, replacing any earlier value.
    pub fn set(&mut self, location: Location, field: &str, value: String) {
        self.values
            .entry(location)
            .or_default()
            .insert(field.to_string(), value);
    }

    pub fn get(&self, location: Location, field: &str) -> Option<&str> {
        self.values
            .get(&location)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }

    /// All values recorded for one location.
    pub fn location(&self, location: Location) -> Option<&BTreeMap<String, String>> {
        self.values.get(&location)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Location, &str, &str)> {
        self.values.iter().flat_map(|(location, fields)| {
            fields
                .iter()
                .map(move |(field, value)| (*location, field.as_str(), value.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(BTreeMap::is_empty)
    }
}

/// Append errors for `field` to the request's result store.
pub fn append_errors(
    req: &mut Request,
    location: Location,
    field: &str,
    errors: Vec<ValidationError>,
) {
    let extensions = req.extensions_mut();
    match extensions.get_mut::<ValidationResults>() {
        Some(results) => results.append(location, field, errors),
        None => {
            let mut results = ValidationResults::default();
            results.append(location, field, errors);
            extensions.insert(results);
        }
    }
}

/// Take every recorded error and reset the store.
///
/// Returns an empty list when nothing was ever recorded.
pub fn drain_errors(req: &mut Request) -> Vec<ValidationError> {
    req.extensions_mut()
        .remove::<ValidationResults>()
        .map(|results| results.flatten())
        .unwrap_or_default()
}

/// Record the final value for `field` in the matched-data store.
pub fn set_value(req: &mut Request, location: Location, field: &str, value: String) {
    let extensions = req.extensions_mut();
    match extensions.get_mut::<MatchedData>() {
        Some(data) => data.set(location, field, value),
        None => {
            let mut data = MatchedData::default();
            data.set(location, field, value);
            extensions.insert(data);
        }
    }
}

/// Snapshot of matched data, distinguishing "never written" from "empty".
pub fn matched_data(req: &Request) -> Result<&MatchedData, MatchedDataError> {
    req.extensions()
        .get::<MatchedData>()
        .ok_or(MatchedDataError::NotPresent)
}

/// Store access for downstream handlers.
pub trait ValidationRequestExt {
    /// Drain all validation errors recorded so far.
    fn drain_validation_errors(&mut self) -> Vec<ValidationError>;

    /// Copy of the recorded errors, leaving the store intact.
    fn validation_errors(&self) -> Vec<ValidationError>;

    fn has_validation_errors(&self) -> bool;

    /// Final sanitized values of every validated field.
    fn matched_data(&self) -> Result<&MatchedData, MatchedDataError>;
}

impl ValidationRequestExt for Request {
    fn drain_validation_errors(&mut self) -> Vec<ValidationError> {
        drain_errors(self)
    }

    fn validation_errors(&self) -> Vec<ValidationError> {
        self.extensions()
            .get::<ValidationResults>()
            .map(ValidationResults::flatten)
            .unwrap_or_default()
    }

    fn has_validation_errors(&self) -> bool {
        self.extensions()
            .get::<ValidationResults>()
            .is_some_and(|results| !results.is_empty())
    }

    fn matched_data(&self) -> Result<&MatchedData, MatchedDataError> {
        matched_data(self)
    }
}
