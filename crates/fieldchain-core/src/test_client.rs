//! TestClient for exercising a layer stack without network binding
//!
//! Sends simulated requests through a [`LayerStack`] and a final handler, the
//! same path a live request takes once routing has resolved it.
//!
//! # Example
//!
//! ```rust,ignore
//! use fieldchain_core::{handler_fn, LayerStack, TestClient, TestRequest};
//!
//! #[tokio::test]
//! async fn test_hello() {
//!     let client = TestClient::new(LayerStack::new(), handler_fn(|_req| async { "Hello" }));
//!
//!     let response = client.get("/").await;
//!     response.assert_status(200);
//!     assert_eq!(response.text(), "Hello");
//! }
//! ```

use crate::middleware::{BoxedNext, LayerStack};
use crate::request::Request;
use crate::response::Response;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use http_body_util::BodyExt;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Test client for driving a layer stack and handler in-process
pub struct TestClient {
    layers: Arc<LayerStack>,
    handler: BoxedNext,
}

impl TestClient {
    /// Create a new test client from a layer stack and the final handler
    pub fn new(layers: LayerStack, handler: BoxedNext) -> Self {
        Self {
            layers: Arc::new(layers),
            handler,
        }
    }

    /// Send a GET request
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(TestRequest::get(path)).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> TestResponse {
        self.request(TestRequest::post(path).json(body)).await
    }

    /// Send a request with full control
    pub async fn request(&self, req: TestRequest) -> TestResponse {
        let request = req.into_request();
        let response = self.layers.execute(request, self.handler.clone()).await;
        TestResponse::from_response(response).await
    }
}

/// Test request builder
///
/// Builds a [`Request`] with custom method, headers, cookies, path parameters
/// and body. Path parameters are supplied directly since no router runs.
#[derive(Debug, Clone)]
pub struct TestRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    path_params: HashMap<String, String>,
}

impl TestRequest {
    /// Create a new request with the given method and path
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: HeaderMap::new(),
            body: None,
            path_params: HashMap::new(),
        }
    }

    /// Create a GET request
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a POST request
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    /// Create a PUT request
    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Add a header to the request
    ///
    /// Repeated names are appended, not replaced.
    pub fn header(mut self, key: &str, value: &str) -> Self {
        if let (Ok(name), Ok(val)) = (
            key.parse::<http::header::HeaderName>(),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, val);
        }
        self
    }

    /// Add a raw header value, bypassing string validation
    pub fn header_bytes(mut self, key: &'static str, value: &[u8]) -> Self {
        if let Ok(val) = HeaderValue::from_bytes(value) {
            self.headers
                .append(http::header::HeaderName::from_static(key), val);
        }
        self
    }

    /// Add a cookie, sent as its own `Cookie` header
    pub fn cookie(self, name: &str, value: &str) -> Self {
        self.header("cookie", &format!("{}={}", name, value))
    }

    /// Set a path parameter as if the router had matched it
    pub fn path_param(mut self, name: &str, value: &str) -> Self {
        self.path_params.insert(name.to_string(), value.to_string());
        self
    }

    /// Set the request body as JSON
    ///
    /// This automatically sets the Content-Type header to `application/json`.
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        if let Ok(bytes) = serde_json::to_vec(body) {
            self.body = Some(Bytes::from(bytes));
            self.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        self
    }

    /// Set the request body as an urlencoded form
    pub fn form(mut self, pairs: &[(&str, &str)]) -> Self {
        let encoded = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.body = Some(Bytes::from(encoded));
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        self
    }

    /// Set the request body as raw bytes
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the Content-Type header
    pub fn content_type(mut self, content_type: &str) -> Self {
        if let Ok(val) = HeaderValue::from_str(content_type) {
            self.headers.insert(header::CONTENT_TYPE, val);
        }
        self
    }

    /// Build the framework [`Request`]
    pub fn into_request(self) -> Request {
        let uri: http::Uri = self
            .path
            .parse()
            .unwrap_or_else(|_| http::Uri::from_static("/"));

        let mut http_req = http::Request::new(self.body.unwrap_or_default());
        *http_req.method_mut() = self.method;
        *http_req.uri_mut() = uri;
        *http_req.headers_mut() = self.headers;

        Request::from_http(http_req, self.path_params)
    }
}

fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Test response with assertion helpers
#[derive(Debug)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    async fn from_response(response: Response) -> Self {
        let (parts, body) = response.into_parts();
        let body_bytes = body
            .collect()
            .await
            .map(|b| b.to_bytes())
            .unwrap_or_default();

        Self {
            status: parts.status,
            headers: parts.headers,
            body: body_bytes,
        }
    }

    /// Get the response status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the response body as a string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse the response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Assert that the response has the expected status code
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    pub fn assert_status(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    /// Assert that the response body contains the given text
    pub fn assert_body_contains(&self, expected: &str) -> &Self {
        let body = self.text();
        assert!(
            body.contains(expected),
            "Expected body to contain '{}', got '{}'",
            expected,
            body
        );
        self
    }
}
