//! Provide the canonical vocabulary shared by the specrun harness and the runtime it exercises.
//!
//! This crate is intentionally small and dependency-free. It contains deterministic tables and helpers that both:
//! - the runtime can use to classify the errors it raises, and
//! - the harness can use to match raised errors and evaluate platform guards.
//!
//! ## Notes
//!
//! - This is a “vocabulary core” crate: **no IO**, no global state, and no harness-specific types.
//! - Current scope: the exception taxonomy (kinds, spellings, hierarchy) and platform identifiers.

pub mod errors;
pub mod lang;
pub mod platform;

pub use errors::ErrorKind;
pub use platform::Platform;
