//! Request types for FieldChain

use bytes::Bytes;
use http::{request::Parts, Extensions, HeaderMap, Method, Uri};
use std::collections::HashMap;

/// HTTP Request wrapper
///
/// Provides access to all parts of an incoming HTTP request. Per-request data
/// written by middleware (validation results, matched field values) lives in
/// [`Request::extensions_mut`].
pub struct Request {
    pub(crate) parts: Parts,
    pub(crate) body: Option<Bytes>,
    pub(crate) path_params: HashMap<String, String>,
}

impl Request {
    /// Create a new request from parts
    pub fn new(parts: Parts, body: Bytes, path_params: HashMap<String, String>) -> Self {
        Self {
            parts,
            body: Some(body),
            path_params,
        }
    }

    /// Build a request from an `http::Request` with a buffered body
    pub fn from_http(req: http::Request<Bytes>, path_params: HashMap<String, String>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts, body, path_params)
    }

    /// Get the HTTP method
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Get the URI
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Get the headers
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Get request extensions
    pub fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    /// Get mutable extensions
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.parts.extensions
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Get the query string
    pub fn query_string(&self) -> Option<&str> {
        self.parts.uri.query()
    }

    /// Borrow the buffered body without consuming it
    ///
    /// Returns `None` once a handler has taken the body.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Take the body bytes (can only be called once)
    pub fn take_body(&mut self) -> Option<Bytes> {
        self.body.take()
    }

    /// Get path parameters
    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    /// Get a specific path parameter
    pub fn path_param(&self, name: &str) -> Option<&String> {
        self.path_params.get(name)
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.parts.method)
            .field("uri", &self.parts.uri)
            .field("version", &self.parts.version)
            .field("path_params", &self.path_params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str, body: &'static str) -> Request {
        let req = http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("x-api-key", "secret")
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap();

        let mut params = HashMap::new();
        params.insert("id".to_string(), "42".to_string());
        Request::from_http(req, params)
    }

    #[test]
    fn body_can_be_borrowed_until_taken() {
        let mut req = request("/users/42", "payload");

        assert_eq!(req.body().map(|b| b.as_ref()), Some(&b"payload"[..]));
        assert_eq!(req.take_body(), Some(Bytes::from_static(b"payload")));
        assert!(req.body().is_none());
        assert!(req.take_body().is_none());
    }

    #[test]
    fn exposes_uri_parts_and_params() {
        let req = request("/users/42?page=2", "");

        assert_eq!(req.path(), "/users/42");
        assert_eq!(req.query_string(), Some("page=2"));
        assert_eq!(req.path_param("id").map(String::as_str), Some("42"));
        assert_eq!(req.headers().get("x-api-key").unwrap(), "secret");
        assert_eq!(*req.method(), Method::POST);
    }
}
