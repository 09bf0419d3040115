//! Layer stack for the FieldChain request pipeline
//!
//! Layers run outermost first on the way in and innermost first on the way
//! out. A layer may short-circuit by returning a response without calling
//! `next`.

use crate::request::Request;
use crate::response::{IntoResponse, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed response future produced by layers and handlers
pub type BoxedFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A boxed next function for middleware chains
pub type BoxedNext = Arc<dyn Fn(Request) -> BoxedFuture + Send + Sync>;

/// Trait for middleware that can be placed in a [`LayerStack`]
pub trait MiddlewareLayer: Send + Sync + 'static {
    /// Apply this middleware to a request, calling `next` to continue the chain
    fn call(&self, req: Request, next: BoxedNext) -> BoxedFuture;

    /// Clone this middleware into a boxed trait object
    fn clone_box(&self) -> Box<dyn MiddlewareLayer>;
}

impl Clone for Box<dyn MiddlewareLayer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Wrap an async handler function as the innermost [`BoxedNext`]
///
/// ```rust,ignore
/// let handler = handler_fn(|req: Request| async move { req.path().to_string() });
/// ```
pub fn handler_fn<F, Fut, R>(f: F) -> BoxedNext
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Arc::new(move |req: Request| {
        let fut = f(req);
        Box::pin(async move { fut.await.into_response() }) as BoxedFuture
    })
}

/// A stack of middleware layers
#[derive(Clone, Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn MiddlewareLayer>>,
}

impl LayerStack {
    /// Create a new empty layer stack
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add a middleware layer to the stack
    ///
    /// Layers are executed in the order they are added (outermost first).
    pub fn push(&mut self, layer: Box<dyn MiddlewareLayer>) {
        self.layers.push(layer);
    }

    /// Builder-style [`LayerStack::push`]
    pub fn layer(mut self, layer: impl MiddlewareLayer) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Get the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Execute the middleware stack with a final handler
    pub fn execute(&self, req: Request, handler: BoxedNext) -> BoxedFuture {
        if self.layers.is_empty() {
            return handler(req);
        }

        // Build the chain from inside out so the first layer pushed runs first
        let mut next = handler;

        for layer in self.layers.iter().rev() {
            let layer = layer.clone_box();
            let current_next = next;
            next = Arc::new(move |req: Request| {
                let layer = layer.clone_box();
                let next = current_next.clone();
                Box::pin(async move { layer.call(req, next).await }) as BoxedFuture
            });
        }

        next(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Method, StatusCode};
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn create_test_request(method: Method, path: &str) -> Request {
        let req = http::Request::builder()
            .method(method)
            .uri(path)
            .body(Bytes::new())
            .unwrap();
        Request::from_http(req, HashMap::new())
    }

    type Order = Arc<Mutex<Vec<(usize, &'static str)>>>;

    /// Records pre/post execution around `next`
    #[derive(Clone)]
    struct OrderTrackingMiddleware {
        id: usize,
        order: Order,
    }

    impl MiddlewareLayer for OrderTrackingMiddleware {
        fn call(&self, req: Request, next: BoxedNext) -> BoxedFuture {
            let id = self.id;
            let order = self.order.clone();

            Box::pin(async move {
                order.lock().unwrap().push((id, "pre"));
                let response = next(req).await;
                order.lock().unwrap().push((id, "post"));
                response
            })
        }

        fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
            Box::new(self.clone())
        }
    }

    /// Answers without calling `next`
    #[derive(Clone)]
    struct ShortCircuitMiddleware {
        status: StatusCode,
    }

    impl MiddlewareLayer for ShortCircuitMiddleware {
        fn call(&self, _req: Request, _next: BoxedNext) -> BoxedFuture {
            let status = self.status;
            Box::pin(async move { status.into_response() })
        }

        fn clone_box(&self) -> Box<dyn MiddlewareLayer> {
            Box::new(self.clone())
        }
    }

    #[tokio::test]
    async fn empty_stack_calls_handler_directly() {
        let stack = LayerStack::new();
        let handler = handler_fn(|_req: Request| async { "direct" });

        let response = stack
            .execute(create_test_request(Method::GET, "/"), handler)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn short_circuit_skips_handler() {
        let called = Arc::new(Mutex::new(false));
        let flag = called.clone();
        let handler = handler_fn(move |_req: Request| {
            let flag = flag.clone();
            async move {
                *flag.lock().unwrap() = true;
                "handler"
            }
        });

        let stack = LayerStack::new().layer(ShortCircuitMiddleware {
            status: StatusCode::UNPROCESSABLE_ENTITY,
        });
        let response = stack
            .execute(create_test_request(Method::POST, "/users"), handler)
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!*called.lock().unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_layers_run_outermost_first(num_layers in 1usize..8usize) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let result: Result<(), TestCaseError> = rt.block_on(async {
                let order: Order = Arc::new(Mutex::new(Vec::new()));

                let mut stack = LayerStack::new();
                for id in 0..num_layers {
                    stack.push(Box::new(OrderTrackingMiddleware { id, order: order.clone() }));
                }

                let handler = handler_fn(|_req: Request| async { StatusCode::OK });
                let _ = stack.execute(create_test_request(Method::GET, "/"), handler).await;

                let recorded = order.lock().unwrap();
                prop_assert_eq!(recorded.len(), num_layers * 2);
                for i in 0..num_layers {
                    prop_assert_eq!(recorded[i], (i, "pre"));
                    prop_assert_eq!(recorded[num_layers + i], (num_layers - 1 - i, "post"));
                }
                Ok(())
            });
            result?;
        }
    }
}
