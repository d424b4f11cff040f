//! Scenario outcomes and the faults that produce them.
//!
//! ## Fault categories
//!
//! - [`AssertionFailure`] / [`UnmetExpectation`]: the system under test did not behave as declared → `Failed`.
//! - [`HarnessUsageError`]: the scenario misused the harness → `Errored(Usage)`, so authors are not misled into
//!   blaming the system under test.
//! - `Raised(RbError)`: an error nobody declared with `to_raise` → `Errored(Unexpected)`.
//!
//! A fault ends its own scenario only; the run continues.

use core::fmt;

use miette::Diagnostic;
use specrun_runtime::RbError;
use thiserror::Error;

/// A declared expectation that did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A stubbed method that was not called the way the scenario declared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Mock '{stub}' expected to receive '{method}' {expected}, but received it {actual} time(s)")]
pub struct UnmetExpectation {
    pub stub: String,
    pub method: String,
    pub expected: String,
    pub actual: usize,
}

/// The scenario itself is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum HarnessUsageError {
    #[error("`{matcher}` checks a value, but the expectation wraps a block")]
    #[diagnostic(code(specrun::usage::block_given), help("use `expect(value)` for value matchers"))]
    BlockGiven { matcher: &'static str },

    #[error("`{matcher}` runs a block, but the expectation wraps a value")]
    #[diagnostic(code(specrun::usage::value_given), help("wrap the action in `expect_block(|| ...)`"))]
    ValueGiven { matcher: &'static str },

    #[error("`not()` cannot be combined with `{matcher}`")]
    #[diagnostic(code(specrun::usage::negated_block), help("use `not_to_raise` instead"))]
    NegatedBlockMatcher { matcher: &'static str },

    #[error("variable `{0}` was read before any hook set it")]
    #[diagnostic(code(specrun::usage::unset_variable))]
    UnsetVariable(String),

    #[error("stub `{0}` was created in a before_all hook")]
    #[diagnostic(
        code(specrun::usage::group_stub),
        help("create stubs in the scenario body or a per-scenario setup hook")
    )]
    GroupStub(String),

    #[error("scenario state cannot move from {from} to {to}")]
    #[diagnostic(code(specrun::usage::invalid_transition))]
    InvalidTransition { from: &'static str, to: &'static str },
}

/// Anything that stops a scenario body.
#[derive(Debug, Error)]
pub enum Fault {
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    #[error(transparent)]
    Unmet(#[from] UnmetExpectation),

    #[error(transparent)]
    Usage(#[from] HarnessUsageError),

    #[error("unexpected {0}")]
    Raised(#[from] RbError),
}

impl Fault {
    /// Fail the scenario with a message.
    pub fn fail(message: impl Into<String>) -> Self {
        Fault::Assertion(AssertionFailure::new(message))
    }

    /// Classify into a terminal outcome.
    pub fn into_outcome(self) -> Outcome {
        match self {
            Fault::Assertion(e) => Outcome::Failed(e.message),
            Fault::Unmet(e) => Outcome::Failed(e.to_string()),
            Fault::Usage(e) => Outcome::Errored(ErrorCause::Usage(e.to_string())),
            Fault::Raised(e) => Outcome::Errored(ErrorCause::Unexpected(e)),
        }
    }
}

/// Why a scenario ended in `Errored`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCause {
    /// The scenario misused the harness.
    Usage(String),
    /// The system under test raised an error nobody expected.
    Unexpected(RbError),
    /// A group-level `before_all` hook failed before the scenario could run.
    Hook(String),
    /// The scenario panicked.
    Panic(String),
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCause::Usage(msg) => write!(f, "harness misuse: {msg}"),
            ErrorCause::Unexpected(err) => write!(f, "unexpected {err}"),
            ErrorCause::Hook(msg) => write!(f, "before_all hook failed: {msg}"),
            ErrorCause::Panic(msg) => write!(f, "panicked: {msg}"),
        }
    }
}

/// Terminal result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
    Skipped(String),
    Errored(ErrorCause),
}

impl Outcome {
    /// Upper-case status label used by reporters.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASSED",
            Outcome::Failed(_) => "FAILED",
            Outcome::Skipped(_) => "SKIPPED",
            Outcome::Errored(_) => "ERROR",
        }
    }

    /// Return true for `Failed` and `Errored`.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_) | Outcome::Errored(_))
    }

    /// Detail text (failure message, skip reason, error cause), if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            Outcome::Passed => None,
            Outcome::Failed(msg) | Outcome::Skipped(msg) => Some(msg.clone()),
            Outcome::Errored(cause) => Some(cause.to_string()),
        }
    }
}

/// Lifecycle of a scenario: `Pending → Running → {Passed, Failed, Skipped, Errored}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScenarioState {
    #[default]
    Pending,
    Running,
    Finished(Outcome),
}

impl ScenarioState {
    fn name(&self) -> &'static str {
        match self {
            ScenarioState::Pending => "Pending",
            ScenarioState::Running => "Running",
            ScenarioState::Finished(_) => "Finished",
        }
    }

    /// `Pending → Running`.
    pub fn start(&mut self) -> Result<(), HarnessUsageError> {
        match self {
            ScenarioState::Pending => {
                *self = ScenarioState::Running;
                Ok(())
            }
            other => Err(HarnessUsageError::InvalidTransition {
                from: other.name(),
                to: "Running",
            }),
        }
    }

    /// `Running → outcome`. Terminal states never change again.
    pub fn finish(&mut self, outcome: Outcome) -> Result<(), HarnessUsageError> {
        match self {
            ScenarioState::Running => {
                *self = ScenarioState::Finished(outcome);
                Ok(())
            }
            other => Err(HarnessUsageError::InvalidTransition {
                from: other.name(),
                to: outcome.label(),
            }),
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            ScenarioState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn into_outcome(self) -> Option<Outcome> {
        match self {
            ScenarioState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use specrun_runtime::errors::type_error;

    #[test]
    fn faults_map_to_distinct_outcomes() {
        assert_eq!(Fault::fail("nope").into_outcome(), Outcome::Failed("nope".to_string()));
        assert!(matches!(
            Fault::from(HarnessUsageError::UnsetVariable("gid".to_string())).into_outcome(),
            Outcome::Errored(ErrorCause::Usage(_))
        ));
        assert!(matches!(
            Fault::from(type_error("x")).into_outcome(),
            Outcome::Errored(ErrorCause::Unexpected(_))
        ));
    }

    #[test]
    fn unmet_expectation_is_a_failure_not_an_error() {
        let unmet = UnmetExpectation {
            stub: "to_proc".to_string(),
            method: "to_proc".to_string(),
            expected: "at least once".to_string(),
            actual: 0,
        };
        let outcome = Fault::from(unmet).into_outcome();
        assert_eq!(outcome.label(), "FAILED");
        assert_eq!(
            outcome.detail().unwrap(),
            "Mock 'to_proc' expected to receive 'to_proc' at least once, but received it 0 time(s)"
        );
    }

    #[test]
    fn lifecycle_moves_forward_only() {
        let mut state = ScenarioState::default();
        assert!(state.finish(Outcome::Passed).is_err());
        state.start().unwrap();
        assert!(state.start().is_err());
        state.finish(Outcome::Skipped("windows only".to_string())).unwrap();
        assert!(state.finish(Outcome::Passed).is_err());
        assert!(state.start().is_err());
        assert_eq!(state.outcome().map(Outcome::label), Some("SKIPPED"));
    }

    #[test]
    fn failure_predicate() {
        assert!(!Outcome::Passed.is_failure());
        assert!(!Outcome::Skipped(String::new()).is_failure());
        assert!(Outcome::Failed(String::new()).is_failure());
        assert!(Outcome::Errored(ErrorCause::Panic("boom".to_string())).is_failure());
    }
}
