//! Runtime objects exercised by the specrun conformance corpus.
//!
//! This crate provides the systems under test: a dynamic value model, callables, a mapping with default-value
//! fallbacks, and the group database. Every language-level failure is returned as an [`RbError`] rather than
//! raised as a panic, so the harness can classify it.

#![deny(clippy::unwrap_used)]

pub mod conversions;
pub mod errors;
pub mod etc;
pub mod hash;
pub mod prelude;
pub mod proc_;
pub mod value;

// Re-export commonly used items
pub use errors::{RbError, RbResult};
pub use value::{RObject, Value};
