//! Scenarios, groups and the per-scenario execution context.
//!
//! A [`Scenario`] is a named body plus optional setup hooks. A [`ScenarioGroup`] collects scenarios that share a
//! description prefix, an optional platform guard, and `before_all` hooks that run once before any of its scenarios.
//!
//! ## Isolation
//!
//! Each scenario gets a fresh [`Context`] seeded with a copy of the variables its group's `before_all` hooks set.
//! Writes made by one scenario are never seen by the next.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use specrun_core::Platform;
use specrun_runtime::Value;
use tracing::{debug, instrument};

use super::guard::PlatformGuard;
use super::outcome::{ErrorCause, Fault, HarnessUsageError, Outcome};
use super::stub::Stub;

/// A setup hook or scenario body.
pub type Hook = Box<dyn Fn(&mut Context) -> Result<(), Fault>>;

/// Mutable state visible to hooks and the scenario body.
#[derive(Debug, Clone)]
pub struct Context {
    platform: Platform,
    vars: HashMap<String, Value>,
    stubs: Vec<Stub>,
    group_level: bool,
}

impl Context {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            vars: HashMap::new(),
            stubs: Vec::new(),
            group_level: false,
        }
    }

    fn for_group(platform: Platform) -> Self {
        Self {
            group_level: true,
            ..Self::new(platform)
        }
    }

    /// Platform the run was resolved for.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Store a variable for later hooks and the body.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.vars.insert(name.to_string(), value.into());
    }

    /// Read a variable.
    ///
    /// ## Errors
    /// - `HarnessUsageError::UnsetVariable` if no hook set `name`.
    pub fn get(&self, name: &str) -> Result<Value, Fault> {
        self.vars
            .get(name)
            .cloned()
            .ok_or_else(|| HarnessUsageError::UnsetVariable(name.to_string()).into())
    }

    /// Create a stub that is verified automatically once the body passes.
    ///
    /// ## Errors
    /// - `HarnessUsageError::GroupStub` when called from a `before_all` hook.
    pub fn stub(&mut self, name: &str) -> Result<Stub, Fault> {
        if self.group_level {
            return Err(HarnessUsageError::GroupStub(name.to_string()).into());
        }
        let stub = Stub::new(name);
        self.stubs.push(stub.clone());
        Ok(stub)
    }

    /// Fresh context for one scenario: same platform and variables, no stubs.
    fn fork(&self) -> Self {
        Self {
            platform: self.platform.clone(),
            vars: self.vars.clone(),
            stubs: Vec::new(),
            group_level: false,
        }
    }

    fn verify_stubs(&self) -> Result<(), Fault> {
        for stub in &self.stubs {
            stub.verify_all_called()?;
        }
        Ok(())
    }
}

/// One named check.
pub struct Scenario {
    name: String,
    setup: Vec<Hook>,
    body: Hook,
}

impl Scenario {
    pub fn new(name: impl Into<String>, body: impl Fn(&mut Context) -> Result<(), Fault> + 'static) -> Self {
        Self {
            name: name.into(),
            setup: Vec::new(),
            body: Box::new(body),
        }
    }

    /// Add a hook that runs before the body of this scenario.
    pub fn with_setup(mut self, hook: impl Fn(&mut Context) -> Result<(), Fault> + 'static) -> Self {
        self.setup.push(Box::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run setup hooks, then the body, then verify stubs.
    ///
    /// A panic is caught and reported as `Errored` so the run can continue.
    #[instrument(skip_all, fields(scenario = %self.name))]
    pub(crate) fn execute(&self, group_ctx: &Context) -> Outcome {
        let mut ctx = group_ctx.fork();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.setup
                .iter()
                .try_for_each(|hook| hook(&mut ctx))
                .and_then(|()| (self.body)(&mut ctx))
                .and_then(|()| ctx.verify_stubs())
        }));

        let outcome = match result {
            Ok(Ok(())) => Outcome::Passed,
            Ok(Err(fault)) => fault.into_outcome(),
            Err(payload) => Outcome::Errored(ErrorCause::Panic(panic_message(payload.as_ref()))),
        };
        debug!(outcome = outcome.label(), "scenario finished");
        outcome
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// A named collection of scenarios with shared setup and an optional platform guard.
pub struct ScenarioGroup {
    name: String,
    guard: Option<PlatformGuard>,
    before_all: Vec<Hook>,
    scenarios: Vec<Scenario>,
}

impl ScenarioGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guard: None,
            before_all: Vec::new(),
            scenarios: Vec::new(),
        }
    }

    /// Add a scenario built from a name and body.
    pub fn it(self, name: impl Into<String>, body: impl Fn(&mut Context) -> Result<(), Fault> + 'static) -> Self {
        self.scenario(Scenario::new(name, body))
    }

    pub fn scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Add a hook that runs once before the first scenario of the group.
    pub fn before_all(mut self, hook: impl Fn(&mut Context) -> Result<(), Fault> + 'static) -> Self {
        self.before_all.push(Box::new(hook));
        self
    }

    /// Only run the group where `guard` allows.
    pub fn guarded(mut self, guard: PlatformGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn guard(&self) -> Option<&PlatformGuard> {
        self.guard.as_ref()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub(crate) fn into_parts(self) -> (String, Option<PlatformGuard>, Vec<Hook>, Vec<Scenario>) {
        (self.name, self.guard, self.before_all, self.scenarios)
    }
}

/// Run `before_all` hooks into a group context.
pub(crate) fn prepare_group(platform: &Platform, hooks: &[Hook]) -> Result<Context, ErrorCause> {
    let mut ctx = Context::for_group(platform.clone());
    let result = panic::catch_unwind(AssertUnwindSafe(|| hooks.iter().try_for_each(|hook| hook(&mut ctx))));
    match result {
        Ok(Ok(())) => Ok(ctx),
        Ok(Err(fault)) => Err(ErrorCause::Hook(fault.to_string())),
        Err(payload) => Err(ErrorCause::Hook(format!("panicked: {}", panic_message(payload.as_ref())))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::harness::expect::expect;

    fn ctx() -> Context {
        Context::new(Platform::new("x86_64-linux"))
    }

    #[test]
    fn setup_runs_before_body() {
        let scenario = Scenario::new("reads gid", |ctx| expect(ctx.get("gid")?).to_eq(Value::Integer(7)))
            .with_setup(|ctx| {
                ctx.set("gid", Value::Integer(7));
                Ok(())
            });
        assert_eq!(scenario.execute(&ctx()), Outcome::Passed);
    }

    #[test]
    fn reading_unset_variable_is_usage_error() {
        let scenario = Scenario::new("typo", |ctx| {
            ctx.get("gdi")?;
            Ok(())
        });
        assert!(matches!(
            scenario.execute(&ctx()),
            Outcome::Errored(ErrorCause::Usage(_))
        ));
    }

    #[test]
    fn scenarios_do_not_share_writes() {
        let group_ctx = ctx();
        let writer = Scenario::new("writer", |ctx| {
            ctx.set("leak", true);
            Ok(())
        });
        let reader = Scenario::new("reader", |ctx| {
            ctx.get("leak")?;
            Ok(())
        });
        assert_eq!(writer.execute(&group_ctx), Outcome::Passed);
        assert!(matches!(reader.execute(&group_ctx), Outcome::Errored(_)));
    }

    #[test]
    fn panics_become_errors() {
        let scenario = Scenario::new("boom", |_| panic!("kaboom"));
        assert_eq!(
            scenario.execute(&ctx()),
            Outcome::Errored(ErrorCause::Panic("kaboom".to_string()))
        );
    }

    #[test]
    fn unused_stub_fails_a_passing_body() {
        let scenario = Scenario::new("forgets stub", |ctx| {
            ctx.stub("to_proc")?.should_receive("to_proc");
            Ok(())
        });
        assert!(matches!(scenario.execute(&ctx()), Outcome::Failed(_)));
    }

    #[test]
    fn failing_before_all_reports_hook_cause() {
        let hooks: Vec<Hook> = vec![Box::new(|_| Err(Fault::fail("id -g failed")))];
        let err = prepare_group(&Platform::new("x86_64-linux"), &hooks).unwrap_err();
        assert_eq!(err, ErrorCause::Hook("id -g failed".to_string()));
    }

    #[test]
    fn before_all_cannot_create_stubs() {
        let hooks: Vec<Hook> = vec![Box::new(|ctx| {
            ctx.stub("conv")?.should_receive("to_proc");
            Ok(())
        })];
        let err = prepare_group(&Platform::new("x86_64-linux"), &hooks).unwrap_err();
        assert_eq!(
            err,
            ErrorCause::Hook("stub `conv` was created in a before_all hook".to_string())
        );
    }
}
