//! Implicit conversion protocols.
//!
//! A value that is not already of the wanted type may still volunteer a conversion by responding to a
//! conversion method (`to_proc`, `to_int`). These helpers make that check explicit: ask the object whether it
//! responds, invoke the method, and validate what comes back.

use crate::errors::{RbResult, no_implicit_conversion, type_error};
use crate::proc_::Proc;
use crate::value::Value;

/// Conversion method consulted when a callable is expected.
pub const TO_PROC: &str = "to_proc";

/// Conversion method consulted when an integer is expected.
pub const TO_INT: &str = "to_int";

/// Convert `value` into a callable.
///
/// ## Returns
/// - `Ok(Some(proc))` for a proc (the same reference) or an object whose `to_proc` returns a proc.
/// - `Ok(None)` if the value does not take part in the protocol.
///
/// ## Errors
/// - `TypeError` if `to_proc` returns something other than a proc.
/// - Whatever `to_proc` itself raises.
pub fn try_convert_to_proc(value: &Value) -> RbResult<Option<Proc>> {
    match value {
        Value::Proc(p) => Ok(Some(p.clone())),
        Value::Object(obj) if obj.respond_to(TO_PROC) => match obj.send(TO_PROC, &[])? {
            Value::Proc(p) => Ok(Some(p)),
            other => Err(type_error(format!(
                "can't convert {cls} to Proc ({cls}#to_proc gives {got})",
                cls = obj.class_name(),
                got = other.class_name()
            ))),
        },
        _ => Ok(None),
    }
}

/// Convert `value` into an integer.
///
/// ## Errors
/// - `TypeError: no implicit conversion from nil to integer` for `nil`.
/// - `TypeError: no implicit conversion of {Class} into Integer` for values that do not respond to `to_int`.
/// - `TypeError` if `to_int` returns a non-integer.
pub fn implicit_integer(value: &Value) -> RbResult<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Nil => Err(type_error("no implicit conversion from nil to integer")),
        Value::Object(obj) if obj.respond_to(TO_INT) => match obj.send(TO_INT, &[])? {
            Value::Integer(n) => Ok(n),
            other => Err(type_error(format!(
                "can't convert {cls} to Integer ({cls}#to_int gives {got})",
                cls = obj.class_name(),
                got = other.class_name()
            ))),
        },
        other => Err(no_implicit_conversion(other.class_name(), "Integer")),
    }
}
