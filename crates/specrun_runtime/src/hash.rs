//! A mapping with a configurable fallback for missing keys.
//!
//! ## Notes
//! - Lookups are **linear-time** (`O(n)`): keys are matched by value equality with a scan. The corpus only builds
//!   small mappings.
//! - A missing key resolves, in order, to the default proc called with `(hash, key)`, then the static default.
//! - Setting either fallback clears the other.
//! - A frozen mapping rejects every mutation with `FrozenError`; the failed call leaves all state unchanged.

use std::cell::RefCell;
use std::rc::Rc;

use crate::conversions::try_convert_to_proc;
use crate::errors::{RbResult, frozen_error, type_error};
use crate::proc_::{Arity, Proc};
use crate::value::Value;

/// Class name used in messages.
pub const CLASS_NAME: &str = "Hash";

#[derive(Default)]
struct HashState {
    entries: Vec<(Value, Value)>,
    default: Value,
    default_proc: Option<Proc>,
    frozen: bool,
}

/// A shared, mutable mapping. Clones refer to the same mapping.
#[derive(Clone, Default)]
pub struct RHash(Rc<RefCell<HashState>>);

impl RHash {
    pub fn new() -> Self {
        Self(Rc::default())
    }

    /// Build a mapping whose missing keys resolve to `default`.
    pub fn with_default(default: impl Into<Value>) -> Self {
        let hash = Self::new();
        hash.0.borrow_mut().default = default.into();
        hash
    }

    /// Build a mapping whose missing keys are computed by `proc`.
    ///
    /// The block form of construction is not subject to the arity check applied by
    /// [`RHash::set_default_proc`].
    pub fn with_default_proc(proc: Proc) -> Self {
        let hash = Self::new();
        hash.0.borrow_mut().default_proc = Some(proc);
        hash
    }

    /// Identity comparison.
    pub fn same(&self, other: &RHash) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().entries.is_empty()
    }

    /// Return true if `key` is stored (fallbacks are not consulted).
    pub fn contains_key(&self, key: &Value) -> bool {
        self.0.borrow().entries.iter().any(|(k, _)| k == key)
    }

    /// Look up `key`, falling back to the default proc or the static default.
    ///
    /// ## Errors
    /// - Whatever the default proc raises.
    pub fn get(&self, key: &Value) -> RbResult<Value> {
        let proc = {
            let state = self.0.borrow();
            if let Some((_, v)) = state.entries.iter().find(|(k, _)| k == key) {
                return Ok(v.clone());
            }
            match &state.default_proc {
                Some(p) => p.clone(),
                None => return Ok(state.default.clone()),
            }
        };
        // The borrow is released so the proc may write back into this mapping.
        proc.call(&[Value::Hash(self.clone()), key.clone()])
    }

    /// Store `value` under `key`, replacing an existing entry.
    ///
    /// ## Errors
    /// - `FrozenError` if frozen.
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> RbResult<()> {
        self.check_frozen()?;
        let key = key.into();
        let value = value.into();
        let mut state = self.0.borrow_mut();
        match state.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => state.entries.push((key, value)),
        }
        Ok(())
    }

    /// Return the static default.
    pub fn default(&self) -> Value {
        self.0.borrow().default.clone()
    }

    /// Replace the static default and clear the default proc. Returns `value`.
    ///
    /// ## Errors
    /// - `FrozenError` if frozen.
    pub fn set_default(&self, value: impl Into<Value>) -> RbResult<Value> {
        self.check_frozen()?;
        let value = value.into();
        let mut state = self.0.borrow_mut();
        state.default = value.clone();
        state.default_proc = None;
        Ok(value)
    }

    /// Return the stored default proc (the same reference that was stored), if any.
    pub fn default_proc(&self) -> Option<Proc> {
        self.0.borrow().default_proc.clone()
    }

    /// Replace the default proc.
    ///
    /// `nil` clears it. A proc is stored as-is. Any other value must convert through `to_proc`.
    ///
    /// ## Returns
    /// - The argument as passed (not the converted proc).
    ///
    /// ## Errors
    /// - `FrozenError` if frozen (checked before anything else, `nil` included).
    /// - `TypeError` if the argument does not convert to a proc.
    /// - `TypeError` if the resulting proc is a lambda that cannot take exactly two arguments.
    pub fn set_default_proc(&self, arg: &Value) -> RbResult<Value> {
        self.check_frozen()?;
        if arg.is_nil() {
            self.0.borrow_mut().default_proc = None;
            return Ok(Value::Nil);
        }

        let proc = try_convert_to_proc(arg)?.ok_or_else(|| {
            type_error(format!(
                "wrong default_proc type {} (expected Proc)",
                arg.class_name()
            ))
        })?;
        if proc.is_lambda() && !takes_two_arguments(proc.arity()) {
            return Err(type_error(format!(
                "default_proc takes two arguments (2 for {})",
                proc.arity().value()
            )));
        }

        let mut state = self.0.borrow_mut();
        state.default_proc = Some(proc);
        state.default = Value::Nil;
        Ok(arg.clone())
    }

    /// Freeze the mapping. Returns a handle to the same mapping.
    pub fn freeze(&self) -> RHash {
        self.0.borrow_mut().frozen = true;
        self.clone()
    }

    pub fn is_frozen(&self) -> bool {
        self.0.borrow().frozen
    }

    /// Render entries as `{key => value, ...}`.
    pub fn inspect(&self) -> String {
        let state = self.0.borrow();
        let body: Vec<String> = state
            .entries
            .iter()
            .map(|(k, v)| format!("{} => {}", k.inspect(), v.inspect()))
            .collect();
        format!("{{{}}}", body.join(", "))
    }

    fn check_frozen(&self) -> RbResult<()> {
        if self.is_frozen() {
            return Err(frozen_error(CLASS_NAME));
        }
        Ok(())
    }
}

/// A lambda default proc must accept a call with exactly `(hash, key)`.
fn takes_two_arguments(arity: Arity) -> bool {
    match arity {
        Arity::Exact(n) => n == 2,
        Arity::AtLeast(n) => n <= 2,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use specrun_core::ErrorKind;

    fn paris() -> Proc {
        Proc::new(Arity::Exact(1), |_| Ok(Value::str("Paris")))
    }

    #[test]
    fn new_mapping_is_empty_with_nil_default() {
        let h = RHash::new();
        assert!(h.is_empty());
        assert!(h.default().is_nil());
        assert!(h.default_proc().is_none());
        assert!(h.get(&Value::symbol("city")).unwrap().is_nil());
    }

    #[test]
    fn missing_keys_use_default_proc() {
        let h = RHash::with_default_proc(paris());
        assert_eq!(h.get(&Value::symbol("city")).unwrap(), Value::str("Paris"));
    }

    #[test]
    fn default_proc_receives_hash_and_key() {
        let p = Proc::lambda(Arity::Exact(2), |args| {
            let hash = args[0].as_hash().cloned().unwrap_or_default();
            hash.insert(args[1].clone(), Value::Integer(1))?;
            Ok(Value::Integer(hash.len() as i64))
        });
        let h = RHash::with_default_proc(p);
        assert_eq!(h.get(&Value::symbol("a")).unwrap(), Value::Integer(1));
        assert!(h.contains_key(&Value::symbol("a")));
        assert_eq!(h.get(&Value::symbol("a")).unwrap(), Value::Integer(1));
    }

    #[test]
    fn stored_values_win_over_fallbacks() {
        let h = RHash::with_default(Value::Integer(42));
        h.insert("k", "v").unwrap();
        assert_eq!(h.get(&Value::str("k")).unwrap(), Value::str("v"));
        assert_eq!(h.get(&Value::str("missing")).unwrap(), Value::Integer(42));
    }

    #[test]
    fn setting_proc_clears_static_default() {
        let h = RHash::with_default(Value::Integer(42));
        h.set_default_proc(&Value::from(Proc::returning(Value::Integer(6)))).unwrap();
        assert!(h.default().is_nil());
        assert_eq!(h.get(&Value::Nil).unwrap(), Value::Integer(6));
    }

    #[test]
    fn setting_static_default_clears_proc() {
        let h = RHash::with_default_proc(paris());
        h.set_default(Value::Integer(7)).unwrap();
        assert!(h.default_proc().is_none());
        assert_eq!(h.get(&Value::Nil).unwrap(), Value::Integer(7));
    }

    #[test]
    fn nil_clears_and_returns_nil() {
        let h = RHash::with_default_proc(paris());
        assert!(h.set_default_proc(&Value::Nil).unwrap().is_nil());
        assert!(h.default_proc().is_none());
        assert!(h.get(&Value::symbol("city")).unwrap().is_nil());
    }

    #[test]
    fn returns_the_argument_by_identity() {
        let h = RHash::new();
        let p = Value::from(Proc::returning(Value::Nil));
        let returned = h.set_default_proc(&p).unwrap();
        assert!(returned.same(&p));
    }

    #[test]
    fn non_convertible_is_type_error() {
        let err = RHash::new().set_default_proc(&Value::Integer(42)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert_eq!(err.message, "wrong default_proc type Integer (expected Proc)");
    }

    #[test]
    fn lambda_arity_rules() {
        let h = RHash::new();
        for ok in [Arity::Exact(2), Arity::AtLeast(0), Arity::AtLeast(2)] {
            let l = Proc::lambda(ok, |_| Ok(Value::Nil));
            assert!(h.set_default_proc(&Value::from(l)).is_ok(), "{ok:?}");
        }
        for bad in [Arity::Exact(1), Arity::Exact(3), Arity::AtLeast(3)] {
            let l = Proc::lambda(bad, |_| Ok(Value::Nil));
            let err = h.set_default_proc(&Value::from(l)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::TypeError, "{bad:?}");
        }
        let err = h
            .set_default_proc(&Value::from(Proc::lambda(Arity::Exact(1), |_| Ok(Value::Nil))))
            .unwrap_err();
        assert_eq!(err.message, "default_proc takes two arguments (2 for 1)");
    }

    #[test]
    fn plain_procs_skip_the_arity_check() {
        let h = RHash::new();
        let p = Proc::new(Arity::Exact(3), |_| Ok(Value::Nil));
        assert!(h.set_default_proc(&Value::from(p)).is_ok());
    }

    #[test]
    fn frozen_rejects_mutation_and_keeps_state() {
        let original = paris();
        let h = RHash::with_default_proc(original.clone()).freeze();
        for arg in [Value::from(Proc::returning(Value::Nil)), Value::Nil] {
            let err = h.set_default_proc(&arg).unwrap_err();
            assert_eq!(err.kind, ErrorKind::FrozenError);
            assert!(err.is_a(ErrorKind::RuntimeError));
        }
        assert!(h.default_proc().unwrap().same(&original));
        assert!(h.insert("k", "v").is_err());
        assert!(h.set_default(Value::Integer(1)).is_err());
    }

    #[test]
    fn inspect_lists_entries() {
        let h = RHash::new();
        h.insert(Value::symbol("a"), Value::Integer(1)).unwrap();
        assert_eq!(h.inspect(), "{:a => 1}");
        assert_eq!(RHash::new().inspect(), "{}");
    }
}
