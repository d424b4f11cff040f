#![forbid(unsafe_code)]
//! specrun: a behavior-spec harness and the conformance corpus it runs.
//!
//! The harness executes named scenarios against the runtime in `specrun_runtime`, classifies each into exactly one
//! outcome, and reports a tally. The corpus pins down `Hash#default_proc` / `Hash#default_proc=` and
//! `Etc.getgrgid`.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `harness` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Scenario bodies**: a panic inside a scenario is caught and reported as `Errored`; it never aborts the run.

pub mod cli;
pub mod harness;
pub mod specs;

pub use harness::{Outcome, Registry, Scenario, ScenarioGroup, Tally};
