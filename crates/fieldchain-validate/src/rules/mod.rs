//! Built-in predicates and transforms.
//!
//! These are plain functions over `&str`; the chain builder wraps them in
//! rule factories.

pub mod sanitizers;
pub mod validators;
