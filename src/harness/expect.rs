//! Expectations and matchers.
//!
//! [`expect`] wraps a value for value matchers, [`expect_block`] wraps a deferred action for the raise matchers.
//! Using a matcher on the wrong kind of subject is reported as harness misuse, not as a failure of the system under
//! test.
//!
//! ## Examples
//!
//! ```rust,ignore
//! expect(h.set_default_proc(&Value::Nil)?).to_be_nil()?;
//! expect_block(|| h.set_default_proc(&Value::Integer(42))).to_raise(ErrorKind::TypeError)?;
//! expect(Value::Integer(1)).not().to_eq(Value::Integer(2))?;
//! ```

use specrun_core::ErrorKind;
use specrun_runtime::{RbResult, Value};

use super::outcome::{Fault, HarnessUsageError};

type Thunk<'a> = Box<dyn FnOnce() -> RbResult<Value> + 'a>;

enum Subject<'a> {
    Value(Value),
    Block(Thunk<'a>),
}

/// A pending check on a value or an action. Each matcher consumes it.
#[must_use = "an expectation does nothing until a matcher is applied"]
pub struct Expectation<'a> {
    subject: Subject<'a>,
    negated: bool,
}

/// Wrap a value for value matchers.
pub fn expect<'a>(actual: impl Into<Value>) -> Expectation<'a> {
    Expectation {
        subject: Subject::Value(actual.into()),
        negated: false,
    }
}

/// Wrap an action for `to_raise` / `not_to_raise`. The action runs when the matcher is applied.
pub fn expect_block<'a, R, F>(action: F) -> Expectation<'a>
where
    R: Into<Value>,
    F: FnOnce() -> RbResult<R> + 'a,
{
    Expectation {
        subject: Subject::Block(Box::new(move || action().map(Into::into))),
        negated: false,
    }
}

impl<'a> Expectation<'a> {
    /// Invert the following value matcher.
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Value equality.
    pub fn to_eq(self, expected: impl Into<Value>) -> Result<(), Fault> {
        let expected = expected.into();
        let (actual, negated) = self.value("to_eq")?;
        check(
            actual == expected,
            negated,
            || format!("Expected {}\n to == {}", actual.inspect(), expected.inspect()),
            || format!("Expected {}\n not to == {}", actual.inspect(), expected.inspect()),
        )
    }

    /// Identity: the same object, not merely an equal one.
    pub fn to_equal(self, expected: &Value) -> Result<(), Fault> {
        let (actual, negated) = self.value("to_equal")?;
        check(
            actual.same(expected),
            negated,
            || format!("Expected {}\n to be identical to {}", actual.inspect(), expected.inspect()),
            || format!("Expected {}\n not to be identical to {}", actual.inspect(), expected.inspect()),
        )
    }

    pub fn to_be_nil(self) -> Result<(), Fault> {
        let (actual, negated) = self.value("to_be_nil")?;
        check(
            actual.is_nil(),
            negated,
            || format!("Expected {} to be nil", actual.inspect()),
            || "Expected a value other than nil".to_string(),
        )
    }

    /// Strictly `true`, not merely truthy.
    pub fn to_be_true(self) -> Result<(), Fault> {
        let (actual, negated) = self.value("to_be_true")?;
        check(
            matches!(actual, Value::Bool(true)),
            negated,
            || format!("Expected {} to be true", actual.inspect()),
            || "Expected a value other than true".to_string(),
        )
    }

    /// Strictly `false`, not merely falsy.
    pub fn to_be_false(self) -> Result<(), Fault> {
        let (actual, negated) = self.value("to_be_false")?;
        check(
            matches!(actual, Value::Bool(false)),
            negated,
            || format!("Expected {} to be false", actual.inspect()),
            || "Expected a value other than false".to_string(),
        )
    }

    /// The value's class is `tag` or descends from it.
    pub fn to_be_kind_of(self, tag: &str) -> Result<(), Fault> {
        let (actual, negated) = self.value("to_be_kind_of")?;
        check(
            actual.is_kind_of(tag),
            negated,
            || format!("Expected {} ({}) to be kind of {tag}", actual.inspect(), actual.class_name()),
            || format!("Expected {} ({}) not to be kind of {tag}", actual.inspect(), actual.class_name()),
        )
    }

    /// The action raises `kind` or a descendant of it.
    pub fn to_raise(self, kind: ErrorKind) -> Result<(), Fault> {
        let action = self.block("to_raise")?;
        match action() {
            Err(err) if err.is_a(kind) => Ok(()),
            Err(err) => Err(Fault::fail(format!("Expected {kind}\nbut got {err}"))),
            Ok(value) => Err(Fault::fail(format!(
                "Expected {kind} but no exception was raised ({} was returned)",
                value.inspect()
            ))),
        }
    }

    /// The action does not raise `kind`. Any other error propagates as unexpected.
    pub fn not_to_raise(self, kind: ErrorKind) -> Result<(), Fault> {
        let action = self.block("not_to_raise")?;
        match action() {
            Ok(_) => Ok(()),
            Err(err) if err.is_a(kind) => Err(Fault::fail(format!("Expected to not get {kind}\nbut got {err}"))),
            Err(err) => Err(Fault::Raised(err)),
        }
    }

    fn value(self, matcher: &'static str) -> Result<(Value, bool), Fault> {
        match self.subject {
            Subject::Value(v) => Ok((v, self.negated)),
            Subject::Block(_) => Err(HarnessUsageError::BlockGiven { matcher }.into()),
        }
    }

    fn block(self, matcher: &'static str) -> Result<Thunk<'a>, Fault> {
        if self.negated {
            return Err(HarnessUsageError::NegatedBlockMatcher { matcher }.into());
        }
        match self.subject {
            Subject::Block(thunk) => Ok(thunk),
            Subject::Value(_) => Err(HarnessUsageError::ValueGiven { matcher }.into()),
        }
    }
}

fn check(
    holds: bool,
    negated: bool,
    message: impl FnOnce() -> String,
    negated_message: impl FnOnce() -> String,
) -> Result<(), Fault> {
    match (holds, negated) {
        (true, false) | (false, true) => Ok(()),
        (false, false) => Err(Fault::fail(message())),
        (true, true) => Err(Fault::fail(negated_message())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use specrun_runtime::errors::{frozen_error, type_error};

    fn is_failure(result: Result<(), Fault>) -> bool {
        matches!(result, Err(Fault::Assertion(_)))
    }

    fn is_usage(result: Result<(), Fault>) -> bool {
        matches!(result, Err(Fault::Usage(_)))
    }

    #[test]
    fn equality_and_negation() {
        assert!(expect(Value::str("Paris")).to_eq("Paris").is_ok());
        assert!(is_failure(expect(Value::str("Paris")).to_eq("Rome")));
        assert!(expect(Value::Integer(1)).not().to_eq(Value::Integer(2)).is_ok());
        assert!(is_failure(expect(Value::Integer(1)).not().to_eq(Value::Integer(1))));
    }

    #[test]
    fn identity_differs_from_equality() {
        let a = Value::str("x");
        let b = Value::str("x");
        assert!(expect(a.clone()).to_eq(b.clone()).is_ok());
        assert!(is_failure(expect(a.clone()).to_equal(&b)));
        assert!(expect(a.clone()).to_equal(&a).is_ok());
    }

    #[test]
    fn booleans_are_strict() {
        assert!(expect(true).to_be_true().is_ok());
        assert!(is_failure(expect(Value::Integer(1)).to_be_true()));
        assert!(is_failure(expect(Value::Nil).to_be_false()));
        assert!(expect(Value::Nil).to_be_nil().is_ok());
    }

    #[test]
    fn raise_matches_descendants() {
        assert!(expect_block(|| Err::<Value, _>(frozen_error("Hash")))
            .to_raise(ErrorKind::RuntimeError)
            .is_ok());
        assert!(is_failure(
            expect_block(|| Err::<Value, _>(type_error("x"))).to_raise(ErrorKind::ArgumentError)
        ));
        assert!(is_failure(expect_block(|| Ok(Value::Nil)).to_raise(ErrorKind::TypeError)));
    }

    #[test]
    fn not_to_raise_propagates_other_errors() {
        assert!(expect_block(|| Ok(Value::Nil)).not_to_raise(ErrorKind::TypeError).is_ok());
        assert!(is_failure(
            expect_block(|| Err::<Value, _>(type_error("x"))).not_to_raise(ErrorKind::TypeError)
        ));
        assert!(matches!(
            expect_block(|| Err::<Value, _>(frozen_error("Hash"))).not_to_raise(ErrorKind::TypeError),
            Err(Fault::Raised(_))
        ));
    }

    #[test]
    fn matcher_subject_mismatch_is_usage_error() {
        assert!(is_usage(expect_block(|| Ok(Value::Nil)).to_be_nil()));
        assert!(is_usage(expect(Value::Nil).to_raise(ErrorKind::TypeError)));
        assert!(is_usage(expect_block(|| Ok(Value::Nil)).not().to_raise(ErrorKind::TypeError)));
    }

    #[test]
    fn block_runs_only_when_matched() {
        let ran = std::cell::Cell::new(false);
        let expectation = expect_block(|| {
            ran.set(true);
            Ok(Value::Nil)
        });
        assert!(!ran.get());
        expectation.not_to_raise(ErrorKind::StandardError).unwrap();
        assert!(ran.get());
    }
}
