//! Run reporters (pytest-style console output and JSON lines).
//!
//! ## Reporter Trait
//!
//! Reporting is separated from execution: [`drive`] pulls reports from a [`RunIter`] and hands each one to a
//! [`Reporter`]. Implement the trait for other output formats.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use serde_json::json;
use specrun_core::Platform;

use super::outcome::Outcome;
use super::registry::{RunIter, ScenarioReport, Tally};

// ============================================================================
// Reporter Trait
// ============================================================================

/// Receives run events in order.
pub trait Reporter {
    /// Called once before the first scenario.
    fn on_run_start(&mut self, _platform: &Platform) -> io::Result<()> {
        Ok(())
    }

    /// Called after each scenario.
    fn on_scenario_complete(&mut self, report: &ScenarioReport) -> io::Result<()>;

    /// Called once after the last scenario.
    fn on_run_complete(&mut self, tally: &Tally, duration: Duration) -> io::Result<()>;
}

/// Run to completion, feeding every report to `reporter`. Returns the final tally.
pub fn drive(mut run: RunIter, reporter: &mut dyn Reporter) -> io::Result<Tally> {
    let started = Instant::now();
    reporter.on_run_start(run.platform())?;
    for report in run.by_ref() {
        reporter.on_scenario_complete(&report)?;
    }
    let tally = run.tally();
    reporter.on_run_complete(&tally, started.elapsed())?;
    Ok(tally)
}

/// `"3 passed, 1 failed, 2 skipped"`; zero counts are left out.
pub fn summary_parts(tally: &Tally) -> String {
    let parts: Vec<String> = [
        (tally.passed, "passed"),
        (tally.failed, "failed"),
        (tally.skipped, "skipped"),
        (tally.errored, "errored"),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, label)| format!("{n} {label}"))
    .collect();

    if parts.is_empty() {
        "no scenarios ran".to_string()
    } else {
        parts.join(", ")
    }
}

// ============================================================================
// Console
// ============================================================================

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Default console reporter (pytest-style).
pub struct ConsoleReporter<W: Write> {
    out: W,
    verbose: bool,
    color: bool,
    failures: Vec<ScenarioReport>,
}

impl ConsoleReporter<io::Stderr> {
    /// Write to stderr with color.
    pub fn stderr(verbose: bool) -> Self {
        Self::new(io::stderr(), verbose)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            color: true,
            failures: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn status(&self, outcome: &Outcome, duration: Duration) -> String {
        let color = match outcome {
            Outcome::Passed => GREEN,
            Outcome::Failed(_) | Outcome::Errored(_) => RED,
            Outcome::Skipped(_) => YELLOW,
        };
        if !self.verbose {
            let mark = match outcome {
                Outcome::Passed => ".",
                Outcome::Failed(_) => "F",
                Outcome::Skipped(_) => "s",
                Outcome::Errored(_) => "E",
            };
            return self.paint(color, mark);
        }
        match outcome {
            Outcome::Skipped(reason) => format!("{} ({reason})", self.paint(color, outcome.label())),
            _ => format!("{} ({}ms)", self.paint(color, outcome.label()), duration.as_millis()),
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_run_start(&mut self, platform: &Platform) -> io::Result<()> {
        if self.verbose {
            writeln!(self.out, "platform: {platform}")?;
        }
        Ok(())
    }

    fn on_scenario_complete(&mut self, report: &ScenarioReport) -> io::Result<()> {
        let status = self.status(&report.outcome, report.duration);
        if self.verbose {
            writeln!(self.out, "{} ... {status}", report.description())?;
        } else {
            write!(self.out, "{status}")?;
        }
        if report.outcome.is_failure() {
            self.failures.push(report.clone());
        }
        Ok(())
    }

    fn on_run_complete(&mut self, tally: &Tally, duration: Duration) -> io::Result<()> {
        if !self.verbose {
            writeln!(self.out)?;
        }

        if !self.failures.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "{}", self.paint(RED, "====== FAILURES ======"))?;
            for report in std::mem::take(&mut self.failures) {
                let header = format!("{} [{}]", report.description(), report.outcome.label());
                writeln!(self.out, "{}", self.paint(RED, &header))?;
                if let Some(detail) = report.outcome.detail() {
                    writeln!(self.out, "{detail}")?;
                }
                writeln!(self.out)?;
            }
        }

        let color = if tally.is_success() { GREEN } else { RED };
        let line = format!("====== {} in {:.2}s ======", summary_parts(tally), duration.as_secs_f64());
        writeln!(self.out, "{}", self.paint(color, &line))
    }
}

// ============================================================================
// JSON lines
// ============================================================================

/// One JSON object per scenario, then one summary object.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn on_run_start(&mut self, platform: &Platform) -> io::Result<()> {
        let event = json!({ "event": "start", "platform": platform.id() });
        writeln!(self.out, "{event}")
    }

    fn on_scenario_complete(&mut self, report: &ScenarioReport) -> io::Result<()> {
        let event = json!({
            "event": "scenario",
            "group": report.group,
            "scenario": report.scenario,
            "status": report.outcome.label().to_lowercase(),
            "detail": report.outcome.detail(),
            "duration_ms": report.duration.as_secs_f64() * 1000.0,
        });
        writeln!(self.out, "{event}")
    }

    fn on_run_complete(&mut self, tally: &Tally, duration: Duration) -> io::Result<()> {
        let event = json!({
            "event": "summary",
            "passed": tally.passed,
            "failed": tally.failed,
            "skipped": tally.skipped,
            "errored": tally.errored,
            "success": tally.is_success(),
            "duration_s": duration.as_secs_f64(),
        });
        writeln!(self.out, "{event}")
    }
}
