//! `Etc.getgrgid`.
//!
//! The expected gid and group name are captured once per group from `id -g` / `id -gn`, so these scenarios check
//! the runtime against the host's own view of the current process.

use std::process::Command;

use specrun_core::{ErrorKind, Platform};
use specrun_runtime::Value;
use specrun_runtime::errors::runtime_error;
use specrun_runtime::etc::{self, GroupDatabase, SystemGroupDatabase, UnsupportedGroupDatabase};

use crate::harness::{Context, Fault, PlatformGuard, ScenarioGroup, expect, expect_block, guard};

const DESCRIPTION: &str = "Etc.getgrgid";

/// Database the runtime uses on `platform`.
fn database_for(platform: &Platform) -> Box<dyn GroupDatabase> {
    if platform.is_windows() {
        Box::new(UnsupportedGroupDatabase)
    } else {
        Box::new(SystemGroupDatabase)
    }
}

fn getgrgid(ctx: &Context, arg: Option<Value>) -> Result<Value, Fault> {
    Ok(etc::getgrgid(database_for(ctx.platform()).as_ref(), arg.as_ref())?)
}

/// Run `id <flag>` and return its trimmed stdout.
fn id(flag: &str) -> Result<String, Fault> {
    let output = Command::new("id")
        .arg(flag)
        .output()
        .map_err(|e| runtime_error(format!("failed to run `id {flag}`: {e}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(runtime_error(format!("`id {flag}` failed: {}", stderr.trim())).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn capture_current_group(ctx: &mut Context) -> Result<(), Fault> {
    let gid: i64 = id("-g")?
        .parse()
        .map_err(|e| runtime_error(format!("`id -g` printed a non-integer: {e}")))?;
    ctx.set("gid", Value::Integer(gid));
    ctx.set("name", id("-gn")?);
    Ok(())
}

/// Check a lookup result against the captured gid and name.
fn expect_current_group(ctx: &Context, gr: &Value) -> Result<(), Fault> {
    let Some(group) = gr.as_group() else {
        return Err(Fault::fail(format!("Expected a group record, got {}", gr.inspect())));
    };
    expect(Value::Integer(i64::from(group.gid))).to_eq(ctx.get("gid")?)?;
    expect(group.name.as_str()).to_eq(ctx.get("name")?)
}

pub fn getgrgid_on_windows() -> ScenarioGroup {
    guard(
        PlatformGuard::is("windows"),
        ScenarioGroup::new(DESCRIPTION).it("returns nil", |ctx| {
            expect(getgrgid(ctx, Some(Value::Integer(1)))?).to_be_nil()?;
            expect(getgrgid(ctx, Some(Value::Nil))?).to_be_nil()?;
            expect(getgrgid(ctx, Some(Value::str("nil")))?).to_be_nil()
        }),
    )
}

pub fn getgrgid_elsewhere() -> ScenarioGroup {
    guard(
        PlatformGuard::is_not("windows"),
        ScenarioGroup::new(DESCRIPTION)
            .before_all(capture_current_group)
            .it("returns a Etc::Group struct instance for the given user", |ctx| {
                let gr = getgrgid(ctx, Some(ctx.get("gid")?))?;
                expect(gr.is_kind_of("Etc::Group")).to_be_true()?;
                expect_current_group(ctx, &gr)
            })
            .it("returns the Etc::Group for a given gid if it exists", |ctx| {
                let grp = getgrgid(ctx, Some(ctx.get("gid")?))?;
                expect(grp.clone()).to_be_kind_of("Etc::Group")?;
                expect_current_group(ctx, &grp)
            })
            .it("uses Process.gid as the default value for the argument", |ctx| {
                let gr = getgrgid(ctx, None)?;
                expect_current_group(ctx, &gr)
            })
            .it("returns the Group for a given gid if it exists", |ctx| {
                let grp = getgrgid(ctx, Some(ctx.get("gid")?))?;
                expect(grp.clone()).to_be_kind_of("Struct::Group")?;
                expect_current_group(ctx, &grp)
            })
            .it("raises if the group does not exist", |ctx| {
                expect_block(|| getgrgid_raw(ctx, &Value::Integer(9876))).to_raise(ErrorKind::ArgumentError)
            })
            .it("raises a TypeError if not passed an Integer", |ctx| {
                expect_block(|| getgrgid_raw(ctx, &Value::str("foo"))).to_raise(ErrorKind::TypeError)?;
                expect_block(|| getgrgid_raw(ctx, &Value::Nil)).to_raise(ErrorKind::TypeError)
            }),
    )
}

/// Lookup that leaves runtime errors unconverted, for the raise matchers.
fn getgrgid_raw(ctx: &Context, arg: &Value) -> specrun_runtime::RbResult<Value> {
    etc::getgrgid(database_for(ctx.platform()).as_ref(), Some(arg))
}
