//! Conformance corpus.
//!
//! Each submodule builds the scenario groups for one runtime surface. [`all`] registers every group in a fixed
//! order, which is the order reports are produced in.

pub mod etc;
pub mod hash;

use crate::harness::Registry;

/// Registry holding the whole corpus.
pub fn all() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_group(hash::default_proc())
        .register_group(hash::default_proc_assign())
        .register_group(etc::getgrgid_on_windows())
        .register_group(etc::getgrgid_elsewhere());
    registry
}
