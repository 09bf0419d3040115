//! Response types for FieldChain
//!
//! The core trait is [`IntoResponse`], which lets handlers and middleware
//! return plain values, JSON payloads, or an [`ApiError`].

use crate::error::{ApiError, ErrorResponse};
use bytes::Bytes;
use http::{header, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// HTTP Response type
pub type Response = http::Response<Full<Bytes>>;

/// Trait for types that can be converted into an HTTP response
pub trait IntoResponse {
    /// Convert self into a Response
    fn into_response(self) -> Response;
}

fn build(status: StatusCode, content_type: Option<&'static str>, body: Bytes) -> Response {
    let mut response = http::Response::new(Full::new(body));
    *response.status_mut() = status;
    if let Some(content_type) = content_type {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(content_type),
        );
    }
    response
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

// () - 200 OK with empty body
impl IntoResponse for () {
    fn into_response(self) -> Response {
        build(StatusCode::OK, None, Bytes::new())
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        build(
            StatusCode::OK,
            Some("text/plain; charset=utf-8"),
            Bytes::from(self),
        )
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        build(
            StatusCode::OK,
            Some("text/plain; charset=utf-8"),
            Bytes::from(self),
        )
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        build(self, None, Bytes::new())
    }
}

impl<R: IntoResponse> IntoResponse for (StatusCode, R) {
    fn into_response(self) -> Response {
        let mut response = self.1.into_response();
        *response.status_mut() = self.0;
        response
    }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        let error_response = ErrorResponse::from(self);
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|_| {
            br#"{"error":{"type":"internal_error","message":"Failed to serialize error"}}"#.to_vec()
        });

        build(status, Some("application/json"), Bytes::from(body))
    }
}

/// JSON response body
///
/// ```rust,ignore
/// async fn echo(req: Request) -> Json<serde_json::Value> {
///     Json(serde_json::json!({ "path": req.path() }))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => build(StatusCode::OK, Some("application/json"), Bytes::from(body)),
            Err(err) => ApiError::internal("Failed to serialize response")
                .with_internal(err.to_string())
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_response_carries_status_and_json() {
        let response = ApiError::bad_request("nope").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn tuple_overrides_status() {
        let response = (StatusCode::ACCEPTED, "queued").into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn json_sets_content_type() {
        let response = Json(serde_json::json!({ "ok": true })).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
