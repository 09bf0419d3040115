//! Field extraction for each request location.
//!
//! Every extractor resolves a field name to a string. A missing field is the
//! empty string, not an error; errors are reserved for requests whose payload
//! cannot be read at all.

use crate::error::ExtractError;
use crate::location::Location;
use fieldchain_core::Request;
use http::header;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Resolve `field` at `location` to its raw string value.
pub fn extract(location: Location, field: &str, req: &mut Request) -> Result<String, ExtractError> {
    match location {
        Location::Body => body(field, req),
        Location::Cookies => Ok(cookie(field, req)),
        Location::Headers => header(field, req),
        Location::Params => Ok(req.path_param(field).cloned().unwrap_or_default()),
        Location::Query => query(field, req),
    }
}

/// Parsed body, cached in the request extensions after the first extraction.
#[derive(Debug, Clone)]
struct ParsedBody(Arc<Result<BodyFields, ExtractError>>);

#[derive(Debug)]
enum BodyFields {
    Empty,
    Json(Map<String, Value>),
    Form(Vec<(String, String)>),
}

fn body(field: &str, req: &mut Request) -> Result<String, ExtractError> {
    let parsed = match req.extensions().get::<ParsedBody>() {
        Some(parsed) => parsed.clone(),
        None => {
            let parsed = ParsedBody(Arc::new(parse_body(req)));
            req.extensions_mut().insert(parsed.clone());
            parsed
        }
    };

    match parsed.0.as_ref() {
        Ok(BodyFields::Empty) => Ok(String::new()),
        Ok(BodyFields::Json(map)) => Ok(map.get(field).map(json_to_string).unwrap_or_default()),
        Ok(BodyFields::Form(pairs)) => Ok(first_value(pairs, field)),
        Err(err) => Err(err.clone()),
    }
}

fn parse_body(req: &Request) -> Result<BodyFields, ExtractError> {
    let bytes = req.body().ok_or(ExtractError::BodyUnavailable)?;
    if bytes.is_empty() {
        return Ok(BodyFields::Empty);
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(BodyFields::Json(map)),
            Ok(other) => Err(ExtractError::MalformedBody(format!(
                "expected a JSON object, found {}",
                json_type(&other)
            ))),
            Err(err) => Err(ExtractError::MalformedBody(err.to_string())),
        }
    } else if mime == "application/x-www-form-urlencoded" {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(bytes)
            .map(BodyFields::Form)
            .map_err(|err| ExtractError::MalformedBody(err.to_string()))
    } else if mime.is_empty() {
        Err(ExtractError::UnsupportedContentType("(none)".to_string()))
    } else {
        Err(ExtractError::UnsupportedContentType(mime))
    }
}

fn json_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn first_value(pairs: &[(String, String)], field: &str) -> String {
    pairs
        .iter()
        .find(|(key, _)| key == field)
        .map(|(_, value)| value.clone())
        .unwrap_or_default()
}

fn query(field: &str, req: &Request) -> Result<String, ExtractError> {
    let raw = req.query_string().unwrap_or("");
    let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(raw)
        .map_err(|err| ExtractError::MalformedQuery(err.to_string()))?;
    Ok(first_value(&pairs, field))
}

fn header(field: &str, req: &Request) -> Result<String, ExtractError> {
    match req.headers().get(field) {
        Some(value) => value
            .to_str()
            .map(str::to_string)
            .map_err(|_| ExtractError::InvalidHeader(field.to_ascii_lowercase())),
        None => Ok(String::new()),
    }
}

fn cookie(field: &str, req: &Request) -> String {
    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(cookie::Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == field)
        .map(|c| c.value().to_string())
        .unwrap_or_default()
}
