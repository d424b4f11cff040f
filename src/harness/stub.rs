//! Test doubles with declared message expectations.
//!
//! A [`Stub`] is handed to the system under test as a runtime object (see [`Stub::to_value`]). It answers only the
//! methods declared with [`Stub::should_receive`], counts every call, and is checked with
//! [`Stub::verify_all_called`] when the scenario body finishes.

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use specrun_runtime::errors::no_method_error;
use specrun_runtime::{RObject, RbResult, Value};

use super::outcome::UnmetExpectation;

/// Class name stubs report to the runtime.
pub const CLASS_NAME: &str = "MockObject";

/// How often a stubbed method must be called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedCalls {
    AtLeastOnce,
    Exactly(usize),
}

impl ExpectedCalls {
    fn satisfied_by(self, calls: usize) -> bool {
        match self {
            ExpectedCalls::AtLeastOnce => calls >= 1,
            ExpectedCalls::Exactly(n) => calls == n,
        }
    }
}

impl fmt::Display for ExpectedCalls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedCalls::AtLeastOnce => f.write_str("at least once"),
            ExpectedCalls::Exactly(1) => f.write_str("exactly once"),
            ExpectedCalls::Exactly(n) => write!(f, "exactly {n} times"),
        }
    }
}

#[derive(Debug)]
struct MethodExpectation {
    method: String,
    returns: Value,
    expected: ExpectedCalls,
    calls: usize,
}

#[derive(Debug)]
struct StubObject {
    name: String,
    methods: RefCell<Vec<MethodExpectation>>,
}

impl RObject for StubObject {
    fn class_name(&self) -> &str {
        CLASS_NAME
    }

    fn respond_to(&self, method: &str) -> bool {
        self.methods.borrow().iter().any(|m| m.method == method)
    }

    fn send(&self, method: &str, _args: &[Value]) -> RbResult<Value> {
        let mut methods = self.methods.borrow_mut();
        match methods.iter_mut().find(|m| m.method == method) {
            Some(m) => {
                m.calls += 1;
                Ok(m.returns.clone())
            }
            None => Err(no_method_error(method, &format!("#<{CLASS_NAME}:{}>", self.name))),
        }
    }
}

/// A shared test double. Clones refer to the same double.
#[derive(Debug, Clone)]
pub struct Stub(Rc<StubObject>);

impl Stub {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Rc::new(StubObject {
            name: name.into(),
            methods: RefCell::new(Vec::new()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Declare that `method` must be called. It returns `nil` and must be called at least once until refined.
    ///
    /// Declaring the same method again replaces the earlier declaration and resets its call count.
    pub fn should_receive(&self, method: &str) -> Receive<'_> {
        let mut methods = self.0.methods.borrow_mut();
        methods.retain(|m| m.method != method);
        methods.push(MethodExpectation {
            method: method.to_string(),
            returns: Value::Nil,
            expected: ExpectedCalls::AtLeastOnce,
            calls: 0,
        });
        Receive {
            stub: self,
            method: method.to_string(),
        }
    }

    /// Number of times `method` has been called.
    pub fn call_count(&self, method: &str) -> usize {
        self.0
            .methods
            .borrow()
            .iter()
            .find(|m| m.method == method)
            .map_or(0, |m| m.calls)
    }

    /// The double as a runtime value. Every call returns the same object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Check every declared expectation.
    ///
    /// ## Errors
    /// - The first expectation whose call count does not match.
    pub fn verify_all_called(&self) -> Result<(), UnmetExpectation> {
        for m in self.0.methods.borrow().iter() {
            if !m.expected.satisfied_by(m.calls) {
                tracing::debug!(stub = %self.0.name, method = %m.method, calls = m.calls, "unmet expectation");
                return Err(UnmetExpectation {
                    stub: self.0.name.clone(),
                    method: m.method.clone(),
                    expected: m.expected.to_string(),
                    actual: m.calls,
                });
            }
        }
        Ok(())
    }

    fn update(&self, method: &str, f: impl FnOnce(&mut MethodExpectation)) {
        if let Some(m) = self.0.methods.borrow_mut().iter_mut().find(|m| m.method == method) {
            f(m);
        }
    }
}

/// Refines a declaration made with [`Stub::should_receive`].
pub struct Receive<'a> {
    stub: &'a Stub,
    method: String,
}

impl Receive<'_> {
    /// Value the stubbed method returns.
    pub fn and_return(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.stub.update(&self.method, |m| m.returns = value);
        self
    }

    /// Require exactly `n` calls.
    pub fn exactly(self, n: usize) -> Self {
        self.stub.update(&self.method, |m| m.expected = ExpectedCalls::Exactly(n));
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use specrun_core::ErrorKind;

    #[test]
    fn answers_declared_methods_only() {
        let stub = Stub::new("converter");
        stub.should_receive("to_proc").and_return(Value::Integer(1));
        let obj = stub.to_value();
        let Value::Object(o) = &obj else {
            panic!("expected object");
        };
        assert!(o.respond_to("to_proc"));
        assert!(!o.respond_to("to_int"));
        assert_eq!(o.send("to_proc", &[]).unwrap(), Value::Integer(1));
        let err = o.send("to_int", &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoMethodError);
        assert_eq!(stub.call_count("to_proc"), 1);
    }

    #[test]
    fn to_value_preserves_identity() {
        let stub = Stub::new("s");
        assert!(stub.to_value().same(&stub.to_value()));
        assert!(!stub.to_value().same(&Stub::new("s").to_value()));
    }

    #[test]
    fn verify_reports_uncalled_method() {
        let stub = Stub::new("to_proc");
        stub.should_receive("to_proc");
        let unmet = stub.verify_all_called().unwrap_err();
        assert_eq!(unmet.actual, 0);
        assert_eq!(unmet.expected, "at least once");
    }

    #[test]
    fn exact_counts_are_enforced() {
        let stub = Stub::new("s");
        stub.should_receive("to_int").and_return(Value::Integer(3)).exactly(2);
        let Value::Object(o) = stub.to_value() else {
            panic!("expected object");
        };
        o.send("to_int", &[]).unwrap();
        assert!(stub.verify_all_called().is_err());
        o.send("to_int", &[]).unwrap();
        assert!(stub.verify_all_called().is_ok());
        o.send("to_int", &[]).unwrap();
        assert_eq!(stub.verify_all_called().unwrap_err().expected, "exactly 2 times");
    }
}
