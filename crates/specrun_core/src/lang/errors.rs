//! Builtin exception vocabulary.
//!
//! This registry exists so the harness can treat exception names as data: resolve a spelling to a kind, print a
//! kind, and walk the class hierarchy when matching a raised error against an expected one.

use crate::errors::ErrorKind;

use super::registry::{Example, LangItemInfo};

/// Metadata for a builtin exception kind.
#[derive(Debug, Clone, Copy)]
pub struct ExceptionInfo {
    pub item: LangItemInfo<ErrorKind>,
    /// Direct superclass; `None` only for `StandardError`.
    pub parent: Option<ErrorKind>,
}

/// Registry of builtin exception kinds.
pub const EXCEPTIONS: &[ExceptionInfo] = &[
    info(
        ErrorKind::StandardError,
        "StandardError",
        None,
        "Root of every error a well-behaved program is expected to rescue.",
        &[],
    ),
    info(
        ErrorKind::ArgumentError,
        "ArgumentError",
        Some(ErrorKind::StandardError),
        "Raised when arguments are wrong: a bad count, or a value the callee cannot use (e.g. an unknown group id).",
        &[Example {
            code: "Etc.getgrgid(9876)",
            note: Some("Raises `ArgumentError: can't find group for 9876` when no such group exists."),
        }],
    ),
    info(
        ErrorKind::TypeError,
        "TypeError",
        Some(ErrorKind::StandardError),
        "Raised when an operation receives a value of an inappropriate type.",
        &[
            Example {
                code: "Hash.new.default_proc = 42",
                note: Some("Raises `TypeError: wrong default_proc type Integer (expected Proc)`."),
            },
            Example {
                code: "Etc.getgrgid(\"foo\")",
                note: Some("Raises `TypeError: no implicit conversion of String into Integer`."),
            },
        ],
    ),
    info(
        ErrorKind::RuntimeError,
        "RuntimeError",
        Some(ErrorKind::StandardError),
        "Generic runtime failure; also the ancestor of frozen-object errors.",
        &[],
    ),
    info(
        ErrorKind::FrozenError,
        "FrozenError",
        Some(ErrorKind::RuntimeError),
        "Raised when mutating a frozen object.",
        &[Example {
            code: "Hash.new.freeze.default_proc = nil",
            note: Some("Raises `FrozenError: can't modify frozen Hash`."),
        }],
    ),
    info(
        ErrorKind::NameError,
        "NameError",
        Some(ErrorKind::StandardError),
        "Raised when a name cannot be resolved.",
        &[],
    ),
    info(
        ErrorKind::NoMethodError,
        "NoMethodError",
        Some(ErrorKind::NameError),
        "Raised when a receiver does not respond to a method.",
        &[],
    ),
    info(
        ErrorKind::IndexError,
        "IndexError",
        Some(ErrorKind::StandardError),
        "Raised when an index or key is out of range.",
        &[],
    ),
    info(
        ErrorKind::KeyError,
        "KeyError",
        Some(ErrorKind::IndexError),
        "Raised when a required key is missing.",
        &[],
    ),
];

/// Return the canonical spelling for an exception kind (e.g. `"TypeError"`).
#[inline]
pub fn as_str(kind: ErrorKind) -> &'static str {
    info_for(kind).item.canonical
}

/// Return the user-facing description for an exception kind.
#[inline]
pub fn description(kind: ErrorKind) -> &'static str {
    info_for(kind).item.description
}

/// Return the documentation examples for an exception kind.
#[inline]
pub fn examples(kind: ErrorKind) -> &'static [Example] {
    info_for(kind).item.examples
}

/// Resolve a spelling to an exception kind.
///
/// Matching is case-sensitive.
pub fn from_str(name: &str) -> Option<ErrorKind> {
    EXCEPTIONS.iter().find(|e| e.item.canonical == name).map(|e| e.item.id)
}

/// Return full metadata for an exception kind.
///
/// ## Panics
/// - If the registry is missing an entry for `kind` (programming error).
pub fn info_for(kind: ErrorKind) -> &'static ExceptionInfo {
    EXCEPTIONS
        .iter()
        .find(|e| e.item.id == kind)
        .expect("exception info missing")
}

const fn info(
    id: ErrorKind,
    canonical: &'static str,
    parent: Option<ErrorKind>,
    description: &'static str,
    examples: &'static [Example],
) -> ExceptionInfo {
    ExceptionInfo {
        item: LangItemInfo {
            id,
            canonical,
            description,
            examples,
        },
        parent,
    }
}
