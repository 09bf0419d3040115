//! # FieldChain
//!
//! Chainable validation and sanitization for HTTP request fields, run as
//! middleware in front of your handlers.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fieldchain::prelude::*;
//!
//! let validation = ValidationLayer::new()
//!     .chain(body("email").trim().is_email())
//!     .chain(body("name").not_empty().bail().is_alpha())
//!     .chain(header("x-locale").optional().whitelist("a-z"));
//!
//! let stack = LayerStack::new().layer(validation);
//! let handler = handler_fn(|mut req: Request| async move {
//!     let errors = req.drain_validation_errors();
//!     if !errors.is_empty() {
//!         return Err(ValidationErrors::from(errors).into_api_error());
//!     }
//!     let email = req
//!         .matched_data()
//!         .ok()
//!         .and_then(|data| data.get(Location::Body, "email"))
//!         .unwrap_or_default()
//!         .to_string();
//!     Ok(email)
//! });
//! ```
//!
//! ## Crates
//!
//! - `fieldchain-core`: request, response, `ApiError`, layer stack
//! - `fieldchain-validate`: chains, executor, stores, extractors
//!
//! ## Optional Features
//!
//! - `test-utils` - `TestClient`, `TestRequest` and `TestResponse` for driving
//!   a layer stack in tests

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export core functionality
pub use fieldchain_core::{
    handler_fn, ApiError, BoxedFuture, BoxedNext, FieldError, IntoResponse, Json, LayerStack,
    MiddlewareLayer, Request, Response,
};

#[cfg(feature = "test-utils")]
pub use fieldchain_core::{TestClient, TestRequest, TestResponse};

// Re-export validation
pub use fieldchain_validate::{
    body, check, cookie, header, param, query, ChainOutcome, ConfigError, ErrorFormatter,
    ExtractError, ExtractionErrorPolicy, Location, MatchedData, MatchedDataError, Messages,
    ValidationChain, ValidationConfig, ValidationError, ValidationErrors, ValidationLayer,
    ValidationRequestExt,
};

/// Lower-level building blocks: rules, factories, stores and extractors.
pub mod validate {
    pub use fieldchain_validate::*;
}

pub use regex::Regex;

/// Install a `tracing` subscriber reading `RUST_LOG`, defaulting to
/// `info,fieldchain=debug`.
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,fieldchain=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Prelude module - import everything you need with `use fieldchain::prelude::*`
pub mod prelude {
    pub use crate::init_tracing;
    pub use fieldchain_core::{
        handler_fn, ApiError, IntoResponse, Json, LayerStack, MiddlewareLayer, Request, Response,
    };
    pub use fieldchain_validate::prelude::*;
    pub use regex::Regex;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::debug!("tracing installed");
    }

    #[test]
    fn prelude_builds_a_layer() {
        use crate::prelude::*;

        let layer = ValidationLayer::new()
            .chain(body("name").trim())
            .chain(query("q").matches(Regex::new("^[a-z]+$").unwrap()));
        assert_eq!(layer.len(), 2);
    }
}
