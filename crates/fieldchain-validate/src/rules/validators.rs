//! String predicates used by the validator builders.
//!
//! Every predicate takes the current value as text. The empty string fails
//! every format check (`is_alpha("")` is `false`); use `optional()` on the
//! chain to let empty values through.

use regex::Regex;
use std::net::IpAddr;
use std::sync::OnceLock;
use validator::{ValidateEmail, ValidateUrl};

// Pre-compiled regex patterns
static ALPHA_REGEX: OnceLock<Regex> = OnceLock::new();
static ALPHANUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();
static INT_REGEX: OnceLock<Regex> = OnceLock::new();
static FLOAT_REGEX: OnceLock<Regex> = OnceLock::new();
static HEX_REGEX: OnceLock<Regex> = OnceLock::new();
static UUID_REGEX: OnceLock<Regex> = OnceLock::new();

fn alpha_regex() -> &'static Regex {
    ALPHA_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z]+$").unwrap())
}

fn alphanumeric_regex() -> &'static Regex {
    ALPHANUMERIC_REGEX.get_or_init(|| Regex::new(r"^[0-9A-Za-z]+$").unwrap())
}

fn numeric_regex() -> &'static Regex {
    NUMERIC_REGEX.get_or_init(|| Regex::new(r"^[+-]?([0-9]*\.)?[0-9]+$").unwrap())
}

fn int_regex() -> &'static Regex {
    INT_REGEX.get_or_init(|| Regex::new(r"^[-+]?(0|[1-9][0-9]*)$").unwrap())
}

fn float_regex() -> &'static Regex {
    FLOAT_REGEX.get_or_init(|| {
        Regex::new(r"^[-+]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][-+]?[0-9]+)?$").unwrap()
    })
}

fn hex_regex() -> &'static Regex {
    HEX_REGEX.get_or_init(|| Regex::new(r"^(0x|0h)?[0-9A-Fa-f]+$").unwrap())
}

fn uuid_regex() -> &'static Regex {
    UUID_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$")
            .unwrap()
    })
}

/// ASCII letters only.
pub fn is_alpha(value: &str) -> bool {
    alpha_regex().is_match(value)
}

/// ASCII letters and digits only.
pub fn is_alphanumeric(value: &str) -> bool {
    alphanumeric_regex().is_match(value)
}

/// Optionally signed decimal number, e.g. `-12`, `+.5`, `3.14`.
pub fn is_numeric(value: &str) -> bool {
    numeric_regex().is_match(value)
}

/// Optionally signed integer without leading zeros.
pub fn is_int(value: &str) -> bool {
    int_regex().is_match(value)
}

/// Decimal or exponent notation with at least one mantissa digit.
pub fn is_float(value: &str) -> bool {
    float_regex().is_match(value)
}

/// One of `true`, `false`, `1`, `0`.
pub fn is_boolean(value: &str) -> bool {
    matches!(value, "true" | "false" | "1" | "0")
}

pub fn is_email(value: &str) -> bool {
    value.to_string().validate_email()
}

pub fn is_url(value: &str) -> bool {
    value.to_string().validate_url()
}

/// IPv4 or IPv6 address.
pub fn is_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

/// Hyphenated UUID of any version.
pub fn is_uuid(value: &str) -> bool {
    uuid_regex().is_match(value)
}

/// Hex digits with an optional `0x`/`0h` prefix.
pub fn is_hexadecimal(value: &str) -> bool {
    hex_regex().is_match(value)
}

/// Non-empty and unchanged by lowercasing.
pub fn is_lowercase(value: &str) -> bool {
    !value.is_empty() && value == value.to_lowercase()
}

/// Non-empty and unchanged by uppercasing.
pub fn is_uppercase(value: &str) -> bool {
    !value.is_empty() && value == value.to_uppercase()
}

/// Non-empty and entirely ASCII.
pub fn is_ascii(value: &str) -> bool {
    !value.is_empty() && value.is_ascii()
}

pub fn is_empty(value: &str) -> bool {
    value.is_empty()
}

/// Length in characters within `min..=max`.
pub fn is_length(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}
