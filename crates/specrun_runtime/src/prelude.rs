//! Prelude module for common runtime imports.
//!
//! ```ignore
//! use specrun_runtime::prelude::*;
//! ```

pub use crate::errors::{RbError, RbResult};
pub use crate::etc::{Group, GroupDatabase, StaticGroupDatabase, SystemGroupDatabase, UnsupportedGroupDatabase};
pub use crate::hash::RHash;
pub use crate::proc_::{Arity, Proc, ProcKind};
pub use crate::value::{RObject, Value};
pub use specrun_core::ErrorKind;
