//! Reporter output over a small registry with one scenario per outcome.

use specrun::harness::{
    ConsoleReporter, Fault, JsonReporter, PlatformGuard, Registry, Scenario, ScenarioGroup, drive, expect,
    summary_parts,
};
use specrun_core::Platform;
use specrun_runtime::Value;
use specrun_runtime::errors::type_error;

fn mixed_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(
        "mixed",
        vec![
            Scenario::new("passes", |_| expect(Value::Integer(1)).to_eq(Value::Integer(1))),
            Scenario::new("fails", |_| expect(Value::Integer(1)).to_eq(Value::Integer(2))),
            Scenario::new("raises", |_| Err(Fault::Raised(type_error("boom")))),
            Scenario::new("misuses", |ctx| {
                ctx.get("never_set")?;
                Ok(())
            }),
        ],
    );
    registry.register_group(
        ScenarioGroup::new("windows")
            .guarded(PlatformGuard::is("windows"))
            .it("only there", |_| Ok(())),
    );
    registry
}

fn linux() -> Platform {
    Platform::new("x86_64-linux")
}

#[test]
fn summary_line() {
    let mut reporter = ConsoleReporter::new(Vec::new(), false).with_color(false);
    let tally = drive(mixed_registry().run_all(linux()), &mut reporter).unwrap();
    insta::assert_snapshot!(summary_parts(&tally), @"1 passed, 1 failed, 1 skipped, 2 errored");
}

#[test]
fn console_progress_marks() {
    let mut reporter = ConsoleReporter::new(Vec::new(), false).with_color(false);
    drive(mixed_registry().run_all(linux()), &mut reporter).unwrap();
    let text = String::from_utf8(reporter.into_inner()).unwrap();
    let progress = text.lines().next().unwrap_or_default();
    insta::assert_snapshot!(progress, @".FEEs");
}

#[test]
fn console_failure_details() {
    let mut reporter = ConsoleReporter::new(Vec::new(), false).with_color(false);
    drive(mixed_registry().run_all(linux()), &mut reporter).unwrap();
    let text = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(text.contains("mixed fails [FAILED]\nExpected 1\n to == 2\n"));
    assert!(text.contains("mixed raises [ERROR]\nunexpected TypeError: boom\n"));
    assert!(text.contains("mixed misuses [ERROR]\nharness misuse: variable `never_set` was read before any hook set it\n"));
    assert!(!text.contains("only there ["));
}

#[test]
fn json_reporter_emits_one_object_per_event() {
    let mut reporter = JsonReporter::new(Vec::new());
    drive(mixed_registry().run_all(linux()), &mut reporter).unwrap();
    let text = String::from_utf8(reporter.into_inner()).unwrap();
    let events: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();

    assert_eq!(events.len(), 1 + 5 + 1);
    assert_eq!(events[0]["platform"], "x86_64-linux");
    let statuses: Vec<&str> = events[1..6].iter().map(|e| e["status"].as_str().unwrap()).collect();
    assert_eq!(statuses, ["passed", "failed", "error", "error", "skipped"]);
    let summary = &events[6];
    assert_eq!(summary["event"], "summary");
    assert_eq!(summary["errored"], 2);
    assert_eq!(summary["success"], false);
}
