//! Exception kinds and the shared user-facing messages raised with them.
//!
//! The runtime builds its errors from these kinds, and the harness matches raised errors against them, so both
//! sides agree on spelling and hierarchy.

use crate::lang;

/// Identify a builtin exception class.
///
/// ## Notes
/// - The hierarchy (parent links) lives in the [`lang::errors`] registry, not in the enum.
/// - `TypeError`, `ArgumentError` and `RuntimeError` are siblings: none of them matches another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StandardError,
    ArgumentError,
    TypeError,
    RuntimeError,
    FrozenError,
    NameError,
    NoMethodError,
    IndexError,
    KeyError,
}

impl ErrorKind {
    /// Return the canonical spelling (e.g. `"TypeError"`).
    pub fn as_str(self) -> &'static str {
        lang::errors::as_str(self)
    }

    /// Return the direct parent kind, or `None` for the root of the taxonomy.
    pub fn parent(self) -> Option<ErrorKind> {
        lang::errors::info_for(self).parent
    }

    /// Return true if `self` is `ancestor` or descends from it.
    ///
    /// ## Examples
    /// ```rust
    /// use specrun_core::ErrorKind;
    ///
    /// assert!(ErrorKind::FrozenError.is_a(ErrorKind::RuntimeError));
    /// assert!(!ErrorKind::TypeError.is_a(ErrorKind::ArgumentError));
    /// ```
    pub fn is_a(self, ancestor: ErrorKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message for any mutation attempted on a frozen receiver (e.g. `"can't modify frozen Hash"`).
pub fn frozen_receiver(class_name: &str) -> String {
    format!("can't modify frozen {class_name}")
}

/// Message for a value that cannot be implicitly converted (e.g. `"no implicit conversion of String into Integer"`).
pub fn no_implicit_conversion(from: &str, into: &str) -> String {
    format!("no implicit conversion of {from} into {into}")
}

/// Message for a call with the wrong number of arguments.
pub fn wrong_number_of_arguments(given: usize, expected: &str) -> String {
    format!("wrong number of arguments (given {given}, expected {expected})")
}

/// Message for a method sent to a receiver that does not respond to it.
pub fn undefined_method(method: &str, receiver: &str) -> String {
    format!("undefined method `{method}' for {receiver}")
}
