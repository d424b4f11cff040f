//! `Hash#default_proc` and `Hash#default_proc=`.

use specrun_core::ErrorKind;
use specrun_runtime::Value;
use specrun_runtime::hash::RHash;
use specrun_runtime::proc_::{Arity, Proc};

use crate::harness::{Fault, ScenarioGroup, expect, expect_block};

/// Mapping whose missing keys resolve to `"Paris"`.
fn paris_hash() -> RHash {
    RHash::with_default_proc(Proc::new(Arity::Exact(1), |_| Ok(Value::str("Paris"))))
}

fn default_proc_of(h: &RHash) -> Result<Proc, Fault> {
    h.default_proc()
        .ok_or_else(|| Fault::fail("Expected a default proc, got nil"))
}

pub fn default_proc() -> ScenarioGroup {
    ScenarioGroup::new("Hash#default_proc")
        .it("returns the block passed to Hash.new", |_| {
            let p = default_proc_of(&paris_hash())?;
            expect(p.call(&[Value::Integer(1)])?).to_eq("Paris")
        })
        .it("returns the same proc object that was passed to Hash.new", |_| {
            let block = Proc::new(Arity::Exact(1), |_| Ok(Value::str("Paris")));
            let h = RHash::with_default_proc(block.clone());
            expect(Value::from(h.default_proc())).to_equal(&Value::from(block))
        })
        .it("returns nil if no block was passed to proc", |_| {
            expect(Value::from(RHash::new().default_proc())).to_be_nil()
        })
}

pub fn default_proc_assign() -> ScenarioGroup {
    ScenarioGroup::new("Hash#default_proc=")
        .it("replaces the block passed to Hash.new", |_| {
            let h = paris_hash();
            h.set_default_proc(&Value::from(Proc::returning("Montreal")))?;
            let p = default_proc_of(&h)?;
            expect(p.call(&[Value::Integer(1)])?).to_eq("Montreal")
        })
        .it("uses :to_proc on its argument", |ctx| {
            let h = paris_hash();
            let stub = ctx.stub("to_proc")?;
            stub.should_receive("to_proc").and_return(Proc::returning("Montreal"));
            let obj = stub.to_value();
            expect(h.set_default_proc(&obj)?).to_equal(&obj)?;
            expect(h.get(&Value::symbol("cool_city"))?).to_eq("Montreal")
        })
        .it("overrides the static default", |_| {
            let h = RHash::with_default(Value::Integer(42));
            h.set_default_proc(&Value::from(Proc::returning(Value::Integer(6))))?;
            expect(h.default()).to_be_nil()?;
            expect(default_proc_of(&h)?.call(&[])?).to_eq(Value::Integer(6))
        })
        .it("raises an error if passed stuff not convertible to procs", |_| {
            let h = RHash::new();
            expect_block(|| h.set_default_proc(&Value::Integer(42))).to_raise(ErrorKind::TypeError)
        })
        .it("returns the passed Proc", |_| {
            let new_proc = Value::from(Proc::returning(Value::Nil));
            expect(RHash::new().set_default_proc(&new_proc)?).to_equal(&new_proc)
        })
        .it("clears the default proc if passed nil", |_| {
            let h = paris_hash();
            h.set_default_proc(&Value::Nil)?;
            expect(Value::from(h.default_proc())).to_be_nil()?;
            expect(h.get(&Value::symbol("city"))?).to_be_nil()
        })
        .it("returns nil if passed nil", |_| {
            expect(RHash::new().set_default_proc(&Value::Nil)?).to_be_nil()
        })
        .it("accepts a lambda with an arity of 2", |_| {
            let h = RHash::new();
            let two = Value::from(Proc::lambda(Arity::Exact(2), |_| Ok(Value::Nil)));
            expect_block(|| h.set_default_proc(&two)).not_to_raise(ErrorKind::TypeError)
        })
        .it("raises a TypeError if passed a lambda with an arity other than 2", |_| {
            let h = RHash::new();
            for arity in [Arity::Exact(1), Arity::Exact(3)] {
                let lambda = Value::from(Proc::lambda(arity, |_| Ok(Value::Nil)));
                expect_block(|| h.set_default_proc(&lambda)).to_raise(ErrorKind::TypeError)?;
            }
            Ok(())
        })
        .it("raises a RuntimeError if self is frozen", |_| {
            let block = Value::from(Proc::returning(Value::Nil));
            expect_block(|| RHash::new().freeze().set_default_proc(&block)).to_raise(ErrorKind::RuntimeError)?;
            expect_block(|| RHash::new().freeze().set_default_proc(&Value::Nil)).to_raise(ErrorKind::RuntimeError)
        })
}
