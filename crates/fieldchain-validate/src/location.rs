//! Request locations a field can be read from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where in the request a field lives.
///
/// Ordering follows declaration order and is used when flattening the
/// per-request stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Top-level member of a JSON or urlencoded body
    Body,
    /// Named cookie from the `Cookie` header(s)
    Cookies,
    /// Request header, matched case-insensitively
    Headers,
    /// Path parameter captured by the router
    Params,
    /// Query string parameter
    Query,
}

impl Location {
    /// All locations, in store order.
    pub const ALL: [Location; 5] = [
        Location::Body,
        Location::Cookies,
        Location::Headers,
        Location::Params,
        Location::Query,
    ];

    /// Lowercase name as it appears in error records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Body => "body",
            Location::Cookies => "cookies",
            Location::Headers => "headers",
            Location::Params => "params",
            Location::Query => "query",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
