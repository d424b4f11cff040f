//! Runtime error values.
//!
//! The vocabulary core (`specrun_core`) owns the canonical taxonomy and shared messages. This module turns them
//! into an error value that runtime operations return, keeping user-facing text aligned with what the harness
//! prints when it reports a raised error.

use core::fmt;

use specrun_core::ErrorKind;
use specrun_core::errors as msg;
use thiserror::Error;

/// An error raised by a runtime operation, rendered as `Kind: message`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RbError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Result of a runtime operation.
pub type RbResult<T> = Result<T, RbError>;

impl RbError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build an error from pre-formatted arguments without an intermediate allocation at the call site.
    pub fn with_fmt(kind: ErrorKind, args: fmt::Arguments<'_>) -> Self {
        Self::new(kind, args.to_string())
    }

    /// Return true if this error is `kind` or one of its descendants.
    pub fn is_a(&self, kind: ErrorKind) -> bool {
        self.kind.is_a(kind)
    }
}

/// `TypeError` with a custom message.
#[cold]
pub fn type_error(message: impl Into<String>) -> RbError {
    RbError::new(ErrorKind::TypeError, message)
}

/// `ArgumentError` with a custom message.
#[cold]
pub fn argument_error(message: impl Into<String>) -> RbError {
    RbError::new(ErrorKind::ArgumentError, message)
}

/// `RuntimeError` with a custom message.
#[cold]
pub fn runtime_error(message: impl Into<String>) -> RbError {
    RbError::new(ErrorKind::RuntimeError, message)
}

/// `FrozenError: can't modify frozen {class_name}`.
#[cold]
pub fn frozen_error(class_name: &str) -> RbError {
    RbError::new(ErrorKind::FrozenError, msg::frozen_receiver(class_name))
}

/// `TypeError: no implicit conversion of {from} into {into}`.
#[cold]
pub fn no_implicit_conversion(from: &str, into: &str) -> RbError {
    type_error(msg::no_implicit_conversion(from, into))
}

/// `NoMethodError: undefined method ...`.
#[cold]
pub fn no_method_error(method: &str, receiver: &str) -> RbError {
    RbError::new(ErrorKind::NoMethodError, msg::undefined_method(method, receiver))
}
