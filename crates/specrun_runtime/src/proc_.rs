//! Callables.
//!
//! Two flavours share one type: plain procs adapt their argument list to the declared parameters (missing
//! arguments become `nil`, extras are dropped), lambdas reject a mismatched argument count with `ArgumentError`.

use core::fmt;
use std::rc::Rc;

use specrun_core::ErrorKind;
use specrun_core::errors::wrong_number_of_arguments;

use crate::errors::{RbError, RbResult};
use crate::value::Value;

type Body = dyn Fn(&[Value]) -> RbResult<Value>;

/// Flavour of a callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcKind {
    Proc,
    Lambda,
}

/// Declared parameter shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` parameters.
    Exact(usize),
    /// `n` required parameters followed by optional or rest parameters.
    AtLeast(usize),
}

impl Arity {
    /// Return true if a call with `given` arguments fits this shape.
    pub fn accepts(self, given: usize) -> bool {
        match self {
            Arity::Exact(n) => given == n,
            Arity::AtLeast(n) => given >= n,
        }
    }

    /// Number of required parameters.
    pub fn required(self) -> usize {
        match self {
            Arity::Exact(n) | Arity::AtLeast(n) => n,
        }
    }

    /// Signed arity number: `n` for exact shapes, `-(n + 1)` for variadic ones.
    pub fn value(self) -> i64 {
        match self {
            Arity::Exact(n) => n as i64,
            Arity::AtLeast(n) => -(n as i64) - 1,
        }
    }

    fn expected(self) -> String {
        match self {
            Arity::Exact(n) => n.to_string(),
            Arity::AtLeast(n) => format!("{n}+"),
        }
    }
}

struct ProcInner {
    kind: ProcKind,
    arity: Arity,
    body: Box<Body>,
}

/// A shared callable. Clones refer to the same proc.
#[derive(Clone)]
pub struct Proc(Rc<ProcInner>);

impl Proc {
    /// Build a lenient proc.
    pub fn new(arity: Arity, body: impl Fn(&[Value]) -> RbResult<Value> + 'static) -> Self {
        Self::with_kind(ProcKind::Proc, arity, body)
    }

    /// Build a strict lambda.
    pub fn lambda(arity: Arity, body: impl Fn(&[Value]) -> RbResult<Value> + 'static) -> Self {
        Self::with_kind(ProcKind::Lambda, arity, body)
    }

    /// Build a zero-parameter proc that returns the same `value` on every call.
    pub fn returning(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(Arity::Exact(0), move |_| Ok(value.clone()))
    }

    fn with_kind(kind: ProcKind, arity: Arity, body: impl Fn(&[Value]) -> RbResult<Value> + 'static) -> Self {
        Self(Rc::new(ProcInner {
            kind,
            arity,
            body: Box::new(body),
        }))
    }

    pub fn kind(&self) -> ProcKind {
        self.0.kind
    }

    pub fn is_lambda(&self) -> bool {
        self.0.kind == ProcKind::Lambda
    }

    pub fn arity(&self) -> Arity {
        self.0.arity
    }

    /// Identity comparison.
    pub fn same(&self, other: &Proc) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Invoke the callable.
    ///
    /// ## Errors
    /// - `ArgumentError` for a lambda called with an argument count its arity rejects.
    /// - Whatever the body raises.
    pub fn call(&self, args: &[Value]) -> RbResult<Value> {
        let inner = &self.0;
        match inner.kind {
            ProcKind::Lambda => {
                if !inner.arity.accepts(args.len()) {
                    return Err(RbError::new(
                        ErrorKind::ArgumentError,
                        wrong_number_of_arguments(args.len(), &inner.arity.expected()),
                    ));
                }
                (inner.body)(args)
            }
            ProcKind::Proc => {
                let required = inner.arity.required();
                if args.len() == required || (args.len() > required && matches!(inner.arity, Arity::AtLeast(_))) {
                    return (inner.body)(args);
                }
                let mut adapted: Vec<Value> = args.iter().take(required).cloned().collect();
                adapted.resize(required, Value::Nil);
                (inner.body)(&adapted)
            }
        }
    }
}

impl PartialEq for Proc {
    fn eq(&self, other: &Proc) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for Proc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addr = Rc::as_ptr(&self.0) as *const () as usize;
        write!(f, "#<Proc:0x{addr:012x}")?;
        if self.is_lambda() {
            f.write_str(" (lambda)")?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn count_args() -> impl Fn(&[Value]) -> RbResult<Value> {
        |args: &[Value]| Ok(Value::Integer(args.len() as i64))
    }

    #[test]
    fn plain_proc_pads_and_truncates() {
        let p = Proc::new(Arity::Exact(2), count_args());
        assert_eq!(p.call(&[]).unwrap(), Value::Integer(2));
        assert_eq!(p.call(&[Value::Nil, Value::Nil, Value::Nil]).unwrap(), Value::Integer(2));
    }

    #[test]
    fn variadic_proc_keeps_extras() {
        let p = Proc::new(Arity::AtLeast(1), count_args());
        assert_eq!(p.call(&[Value::Nil, Value::Nil, Value::Nil]).unwrap(), Value::Integer(3));
        assert_eq!(p.call(&[]).unwrap(), Value::Integer(1));
    }

    #[test]
    fn lambda_rejects_wrong_count() {
        let l = Proc::lambda(Arity::Exact(2), count_args());
        let err = l.call(&[Value::Nil]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArgumentError);
        assert_eq!(err.message, "wrong number of arguments (given 1, expected 2)");
        assert_eq!(l.call(&[Value::Nil, Value::Nil]).unwrap(), Value::Integer(2));
    }

    #[test]
    fn arity_numbers() {
        assert_eq!(Arity::Exact(2).value(), 2);
        assert_eq!(Arity::AtLeast(0).value(), -1);
        assert_eq!(Arity::AtLeast(2).value(), -3);
    }

    #[test]
    fn returning_yields_the_same_value_each_call() {
        let p = Proc::returning("Montreal");
        let first = p.call(&[]).unwrap();
        assert!(first.same(&p.call(&[]).unwrap()));
    }

    #[test]
    fn clones_share_identity() {
        let p = Proc::returning("Paris");
        let q = p.clone();
        assert!(p.same(&q));
        assert!(!p.same(&Proc::returning("Paris")));
    }

    #[test]
    fn debug_marks_lambdas() {
        let l = Proc::lambda(Arity::Exact(0), |_| Ok(Value::Nil));
        assert!(format!("{l:?}").ends_with("(lambda)>"));
        assert!(!format!("{:?}", Proc::returning(Value::Integer(1))).contains("lambda"));
    }
}
