//! Dynamic values handled by the runtime and inspected by the harness.
//!
//! ## Notes
//! - Reference-typed variants (`Str`, `Proc`, `Hash`, `Group`, `Object`) are shared handles; cloning a `Value`
//!   clones the handle, so identity survives being passed around.
//! - `==` (`PartialEq`) is value equality; [`Value::same`] is identity. Procs, hashes and objects compare by
//!   identity under both.

use core::fmt;
use std::rc::Rc;

use crate::errors::RbResult;
use crate::etc::Group;
use crate::hash::RHash;
use crate::proc_::Proc;

/// An object implemented outside the runtime that can receive messages (e.g. a test double).
pub trait RObject: fmt::Debug {
    /// Class name used in error messages and `kind_of` checks.
    fn class_name(&self) -> &str;

    /// Return true if the object handles `method`.
    fn respond_to(&self, method: &str) -> bool;

    /// Invoke `method`. Unknown methods fail with `NoMethodError`.
    fn send(&self, method: &str, args: &[Value]) -> RbResult<Value>;
}

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Integer(i64),
    Str(Rc<str>),
    Symbol(Rc<str>),
    Proc(Proc),
    Hash(RHash),
    Group(Rc<Group>),
    Object(Rc<dyn RObject>),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn symbol(s: &str) -> Self {
        Value::Symbol(Rc::from(s))
    }

    /// Wrap an external object in a fresh handle. Keep the returned value to preserve identity.
    pub fn object(obj: impl RObject + 'static) -> Self {
        Value::Object(Rc::new(obj))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Truthiness: everything except `nil` and `false`.
    pub fn truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_proc(&self) -> Option<&Proc> {
        match self {
            Value::Proc(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&RHash> {
        match self {
            Value::Hash(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Value::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Identity comparison: same allocation for reference types, same value for immediates.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            (Value::Proc(a), Value::Proc(b)) => a.same(b),
            (Value::Hash(a), Value::Hash(b)) => a.same(b),
            (Value::Group(a), Value::Group(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Return the class name of the value.
    pub fn class_name(&self) -> &str {
        match self {
            Value::Nil => "NilClass",
            Value::Bool(true) => "TrueClass",
            Value::Bool(false) => "FalseClass",
            Value::Integer(_) => "Integer",
            Value::Str(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::Proc(_) => "Proc",
            Value::Hash(_) => "Hash",
            Value::Group(_) => Group::CLASS_NAME,
            Value::Object(o) => o.class_name(),
        }
    }

    /// Return true if `tag` names the value's class or one of its ancestors.
    pub fn is_kind_of(&self, tag: &str) -> bool {
        if tag == "Object" || tag == "BasicObject" || tag == self.class_name() {
            return true;
        }
        let ancestors: &[&str] = match self {
            Value::Integer(_) => &["Numeric", "Comparable"],
            Value::Str(_) => &["Comparable"],
            Value::Hash(_) => &["Enumerable"],
            Value::Group(_) => &[Group::ALIAS, "Struct", "Enumerable"],
            _ => &[],
        };
        ancestors.contains(&tag)
    }

    /// Render the value for failure messages.
    pub fn inspect(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Str(s) => format!("{:?}", &**s),
            Value::Symbol(s) => format!(":{s}"),
            Value::Proc(p) => format!("{p:?}"),
            Value::Hash(h) => h.inspect(),
            Value::Group(g) => g.inspect(),
            Value::Object(o) => format!("#<{}>", o.class_name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Group(a), Value::Group(b)) => a == b,
            _ => self.same(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Str(s) | Value::Symbol(s) => f.write_str(s),
            other => f.write_str(&other.inspect()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<Proc> for Value {
    fn from(p: Proc) -> Self {
        Value::Proc(p)
    }
}

impl From<RHash> for Value {
    fn from(h: RHash) -> Self {
        Value::Hash(h)
    }
}

impl From<Group> for Value {
    fn from(g: Group) -> Self {
        Value::Group(Rc::new(g))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}
