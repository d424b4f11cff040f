//! Scenario registry and the lazy run loop.
//!
//! [`Registry::run_all`] returns a [`RunIter`] that executes one scenario per `next()` call, in registration order.
//! Groups are activated lazily: the platform guard is evaluated and `before_all` hooks run when the first
//! scenario of a group is requested.

use std::time::{Duration, Instant};
use std::vec;

use specrun_core::Platform;
use tracing::{debug, info, info_span, trace};

use super::outcome::{ErrorCause, HarnessUsageError, Outcome, ScenarioState};
use super::scenario::{Context, Scenario, ScenarioGroup, prepare_group};

/// Options that narrow or shorten a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Only run scenarios whose `"<group> <scenario>"` description contains this text.
    pub filter: Option<String>,
    /// Stop after the first failed or errored scenario.
    pub stop_on_fail: bool,
}

impl RunOptions {
    fn selects(&self, group: &str, scenario: &str) -> bool {
        match &self.filter {
            None => true,
            Some(f) => format!("{group} {scenario}").contains(f.as_str()),
        }
    }
}

/// Per-outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed(_) => self.failed += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Errored(_) => self.errored += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.errored
    }

    /// Return true if nothing failed or errored.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

/// Result of one scenario as reported to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub group: String,
    pub scenario: String,
    pub outcome: Outcome,
    pub duration: Duration,
}

impl ScenarioReport {
    /// `"<group> <scenario>"`.
    pub fn description(&self) -> String {
        format!("{} {}", self.group, self.scenario)
    }
}

/// Ordered collection of scenario groups.
#[derive(Default)]
pub struct Registry {
    groups: Vec<ScenarioGroup>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register unguarded scenarios under `group_name`.
    pub fn register(&mut self, group_name: &str, scenarios: Vec<Scenario>) -> &mut Self {
        let group = scenarios
            .into_iter()
            .fold(ScenarioGroup::new(group_name), ScenarioGroup::scenario);
        self.register_group(group)
    }

    pub fn register_group(&mut self, group: ScenarioGroup) -> &mut Self {
        trace!(group = group.name(), scenarios = group.scenarios().len(), "registered");
        self.groups.push(group);
        self
    }

    pub fn groups(&self) -> &[ScenarioGroup] {
        &self.groups
    }

    /// Number of registered scenarios across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.scenarios().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every scenario on `platform`.
    pub fn run_all(self, platform: Platform) -> RunIter {
        self.run_with(platform, RunOptions::default())
    }

    /// Run the scenarios selected by `options` on `platform`.
    pub fn run_with(self, platform: Platform, options: RunOptions) -> RunIter {
        info!(platform = %platform, scenarios = self.len(), "starting run");
        RunIter {
            groups: self.groups.into_iter(),
            active: None,
            platform,
            options,
            tally: Tally::default(),
            halted: false,
        }
    }
}

enum GroupMode {
    Run(Context),
    Skip(String),
    Broken(ErrorCause),
}

struct ActiveGroup {
    name: String,
    mode: GroupMode,
    scenarios: vec::IntoIter<Scenario>,
}

/// Lazy, single-pass run over a registry. Yields one report per executed scenario.
pub struct RunIter {
    groups: vec::IntoIter<ScenarioGroup>,
    active: Option<ActiveGroup>,
    platform: Platform,
    options: RunOptions,
    tally: Tally,
    halted: bool,
}

impl RunIter {
    /// Counts for the scenarios yielded so far.
    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Activate the next group that has at least one selected scenario.
    fn activate_next_group(&mut self) -> Option<ActiveGroup> {
        for group in self.groups.by_ref() {
            let (name, guard, before_all, scenarios) = group.into_parts();
            let selected: Vec<Scenario> = scenarios
                .into_iter()
                .filter(|s| self.options.selects(&name, s.name()))
                .collect();
            if selected.is_empty() {
                continue;
            }

            let _span = info_span!("group", name = %name).entered();
            let mode = match guard.as_ref() {
                Some(g) if !g.allows(&self.platform) => {
                    debug!(guard = %g, "group skipped by platform guard");
                    GroupMode::Skip(g.skip_reason(&self.platform))
                }
                _ => match prepare_group(&self.platform, &before_all) {
                    Ok(ctx) => GroupMode::Run(ctx),
                    Err(cause) => {
                        debug!(%cause, "before_all failed");
                        GroupMode::Broken(cause)
                    }
                },
            };
            return Some(ActiveGroup {
                name,
                mode,
                scenarios: selected.into_iter(),
            });
        }
        None
    }
}

fn run_scenario(mode: &GroupMode, scenario: &Scenario) -> Result<Outcome, HarnessUsageError> {
    let mut state = ScenarioState::Pending;
    state.start()?;
    let outcome = match mode {
        GroupMode::Skip(reason) => Outcome::Skipped(reason.clone()),
        GroupMode::Broken(cause) => Outcome::Errored(cause.clone()),
        GroupMode::Run(ctx) => scenario.execute(ctx),
    };
    state.finish(outcome)?;
    state.into_outcome().ok_or(HarnessUsageError::InvalidTransition {
        from: "Running",
        to: "Finished",
    })
}

impl Iterator for RunIter {
    type Item = ScenarioReport;

    fn next(&mut self) -> Option<ScenarioReport> {
        if self.halted {
            return None;
        }
        loop {
            if self.active.is_none() {
                self.active = Some(self.activate_next_group()?);
            }
            let active = self.active.as_mut()?;
            let Some(scenario) = active.scenarios.next() else {
                self.active = None;
                continue;
            };

            let started = Instant::now();
            let outcome = run_scenario(&active.mode, &scenario)
                .unwrap_or_else(|e| Outcome::Errored(ErrorCause::Usage(e.to_string())));
            let report = ScenarioReport {
                group: active.name.clone(),
                scenario: scenario.name().to_string(),
                outcome,
                duration: started.elapsed(),
            };

            self.tally.record(&report.outcome);
            if self.options.stop_on_fail && report.outcome.is_failure() {
                info!(scenario = %report.description(), "stopping after first failure");
                self.halted = true;
            }
            return Some(report);
        }
    }
}
