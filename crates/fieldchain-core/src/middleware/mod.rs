//! Middleware infrastructure for FieldChain
//!
//! Validation layers, and anything else that must run before a handler,
//! implement [`MiddlewareLayer`] and are composed in a [`LayerStack`].
//!
//! # Example
//!
//! ```rust,ignore
//! use fieldchain_core::{handler_fn, LayerStack};
//!
//! let mut stack = LayerStack::new();
//! stack.push(Box::new(my_layer));
//! let response = stack.execute(request, handler_fn(|_req| async { "ok" })).await;
//! ```

mod layer;

pub use layer::{handler_fn, BoxedFuture, BoxedNext, LayerStack, MiddlewareLayer};
