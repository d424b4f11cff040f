//! Vocabulary registries.
//!
//! Callers work with **stable IDs** (e.g. [`crate::ErrorKind`]) and look up spellings and metadata via registry
//! tables, instead of comparing strings scattered across the harness.
//!
//! ## Examples
//! ```rust
//! use specrun_core::lang::errors;
//! use specrun_core::ErrorKind;
//!
//! assert_eq!(errors::from_str("TypeError"), Some(ErrorKind::TypeError));
//! assert_eq!(errors::as_str(ErrorKind::TypeError), "TypeError");
//! ```

pub mod errors;
pub mod registry;
