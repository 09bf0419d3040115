//! # FieldChain Core
//!
//! The host framework surface that FieldChain validation middleware plugs into:
//! the request wrapper, response conversion, the structured API error, and the
//! middleware layer stack.
//!
//! This crate is not meant to be used directly. Use `fieldchain` instead.

mod error;
pub mod middleware;
mod request;
mod response;
#[cfg(any(test, feature = "test-utils"))]
mod test_client;

// Public API
pub use error::{ApiError, FieldError};
pub use middleware::{handler_fn, BoxedFuture, BoxedNext, LayerStack, MiddlewareLayer};
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
#[cfg(any(test, feature = "test-utils"))]
pub use test_client::{TestClient, TestRequest, TestResponse};
