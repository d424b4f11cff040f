//! Behavior-spec harness.
//!
//! Scenarios are grouped, optionally guarded by platform, and run lazily through a [`Registry`]. Each scenario ends
//! in exactly one [`Outcome`]; a fault in one scenario never stops the others.

#![deny(clippy::unwrap_used)]

pub mod expect;
pub mod guard;
pub mod outcome;
pub mod registry;
pub mod reporter;
pub mod scenario;
pub mod stub;

pub use expect::{Expectation, expect, expect_block};
pub use guard::{PlatformGuard, guard};
pub use outcome::{AssertionFailure, ErrorCause, Fault, HarnessUsageError, Outcome, ScenarioState, UnmetExpectation};
pub use registry::{Registry, RunIter, RunOptions, ScenarioReport, Tally};
pub use reporter::{ConsoleReporter, JsonReporter, Reporter, drive, summary_parts};
pub use scenario::{Context, Hook, Scenario, ScenarioGroup};
pub use stub::{ExpectedCalls, Stub};
