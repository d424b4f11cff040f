//! Group database lookups.
//!
//! [`getgrgid`] is the entry point the corpus exercises. It is written against the [`GroupDatabase`] trait so the
//! host's database, an in-memory table, or a platform without a group database can stand behind it.
//!
//! ## Notes
//! - On Unix, [`SystemGroupDatabase`] calls `getgrgid_r` with a growing buffer. An OS failure is returned as an
//!   error, never retried indefinitely.
//! - Platforms without a group database answer `nil` for every input, including inputs that would otherwise be
//!   type errors.

use tracing::debug;

use crate::conversions::implicit_integer;
use crate::errors::{RbResult, argument_error, runtime_error};
use crate::value::Value;

/// A group database record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub passwd: String,
    pub gid: u32,
    pub mem: Vec<String>,
}

impl Group {
    /// Class name reported for records.
    pub const CLASS_NAME: &'static str = "Etc::Group";
    /// Historical name for the same record type; records answer to both.
    pub const ALIAS: &'static str = "Struct::Group";

    /// Render as `#<struct Etc::Group name="wheel", passwd="x", gid=0, mem=["root"]>`.
    pub fn inspect(&self) -> String {
        format!(
            "#<struct {} name={:?}, passwd={:?}, gid={}, mem={:?}>",
            Self::CLASS_NAME,
            self.name,
            self.passwd,
            self.gid,
            self.mem
        )
    }
}

/// Errors surfaced by a database backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupLookupError {
    #[error("getgrgid_r({gid}) failed with errno {errno}")]
    Os { gid: u32, errno: i32 },

    #[error("group record for gid {gid} does not fit in {limit} bytes")]
    BufferLimit { gid: u32, limit: usize },
}

/// A source of group records.
pub trait GroupDatabase {
    /// Return false on platforms without a group database.
    fn supported(&self) -> bool;

    /// Real group id of the current process, if the platform has one.
    fn current_gid(&self) -> Option<u32>;

    /// Look up a record. `Ok(None)` means no such group.
    fn lookup(&self, gid: u32) -> Result<Option<Group>, GroupLookupError>;
}

/// The host's group database.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGroupDatabase;

impl GroupDatabase for SystemGroupDatabase {
    fn supported(&self) -> bool {
        cfg!(unix)
    }

    fn current_gid(&self) -> Option<u32> {
        current_gid()
    }

    fn lookup(&self, gid: u32) -> Result<Option<Group>, GroupLookupError> {
        sys::getgrgid(gid)
    }
}

/// A database that is never available, as on Windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedGroupDatabase;

impl GroupDatabase for UnsupportedGroupDatabase {
    fn supported(&self) -> bool {
        false
    }

    fn current_gid(&self) -> Option<u32> {
        None
    }

    fn lookup(&self, _gid: u32) -> Result<Option<Group>, GroupLookupError> {
        Ok(None)
    }
}

/// An in-memory database.
#[derive(Debug, Clone, Default)]
pub struct StaticGroupDatabase {
    pub groups: Vec<Group>,
    pub current_gid: Option<u32>,
}

impl GroupDatabase for StaticGroupDatabase {
    fn supported(&self) -> bool {
        true
    }

    fn current_gid(&self) -> Option<u32> {
        self.current_gid
    }

    fn lookup(&self, gid: u32) -> Result<Option<Group>, GroupLookupError> {
        Ok(self.groups.iter().find(|g| g.gid == gid).cloned())
    }
}

/// Real group id of the current process (`None` off Unix).
pub fn current_gid() -> Option<u32> {
    sys::getgid()
}

/// Look up a group record by id.
///
/// `arg == None` means the argument was omitted, in which case the current process's group is used.
///
/// ## Returns
/// - A `Group` value, or `nil` when `db` is unsupported (for any `arg`).
///
/// ## Errors
/// - `TypeError` if `arg` is not integer-like (`nil` and strings included).
/// - `ArgumentError: can't find group for {gid}` if no such group exists.
/// - `RuntimeError` if the backend fails.
pub fn getgrgid(db: &dyn GroupDatabase, arg: Option<&Value>) -> RbResult<Value> {
    if !db.supported() {
        return Ok(Value::Nil);
    }

    let gid = match arg {
        None => db
            .current_gid()
            .ok_or_else(|| runtime_error("current process has no group id"))?,
        Some(v) => {
            let n = implicit_integer(v)?;
            u32::try_from(n).map_err(|_| argument_error(format!("can't find group for {n}")))?
        }
    };

    match db.lookup(gid) {
        Ok(Some(group)) => {
            debug!(gid, name = %group.name, "group found");
            Ok(Value::from(group))
        }
        Ok(None) => Err(argument_error(format!("can't find group for {gid}"))),
        Err(e) => Err(runtime_error(e.to_string())),
    }
}

#[cfg(unix)]
mod sys {
    use std::ffi::CStr;

    use super::{Group, GroupLookupError};

    const INITIAL_BUFFER: usize = 1024;
    const MAX_BUFFER: usize = 1 << 20;

    pub(super) fn getgid() -> Option<u32> {
        // SAFETY: getgid has no preconditions and cannot fail.
        Some(unsafe { libc::getgid() })
    }

    pub(super) fn getgrgid(gid: u32) -> Result<Option<Group>, GroupLookupError> {
        // SAFETY: sysconf only reads a configuration value.
        let hint = unsafe { libc::sysconf(libc::_SC_GETGR_R_SIZE_MAX) };
        let mut buf_len = if hint > 0 { hint as usize } else { INITIAL_BUFFER };

        loop {
            let mut buf: Vec<libc::c_char> = vec![0; buf_len];
            // SAFETY: `libc::group` is plain old data; all-zero is a valid value that getgrgid_r overwrites.
            let mut grp: libc::group = unsafe { std::mem::zeroed() };
            let mut result: *mut libc::group = std::ptr::null_mut();

            // SAFETY: every pointer refers to a live local, and `buf.len()` is the true buffer size.
            let rc = unsafe {
                libc::getgrgid_r(
                    gid as libc::gid_t,
                    &mut grp,
                    buf.as_mut_ptr(),
                    buf.len(),
                    &mut result,
                )
            };

            match rc {
                0 if result.is_null() => return Ok(None),
                0 => return Ok(Some(read_group(&grp))),
                libc::ERANGE if buf_len < MAX_BUFFER => buf_len *= 2,
                libc::ERANGE => return Err(GroupLookupError::BufferLimit { gid, limit: MAX_BUFFER }),
                errno if means_not_found(errno) => return Ok(None),
                errno => return Err(GroupLookupError::Os { gid, errno }),
            }
        }
    }

    /// Codes some libcs return instead of a null result for a missing group. Anything else, `EPERM` included, is a
    /// lookup failure.
    pub(super) fn means_not_found(errno: i32) -> bool {
        matches!(errno, libc::ENOENT | libc::ESRCH)
    }

    fn read_group(grp: &libc::group) -> Group {
        let mut mem = Vec::new();
        if !grp.gr_mem.is_null() {
            let mut i = 0;
            loop {
                // SAFETY: gr_mem is a NULL-terminated array filled in by getgrgid_r.
                let member = unsafe { *grp.gr_mem.add(i) };
                if member.is_null() {
                    break;
                }
                mem.push(lossy(member));
                i += 1;
            }
        }
        Group {
            name: lossy(grp.gr_name),
            passwd: lossy(grp.gr_passwd),
            gid: grp.gr_gid as u32,
            mem,
        }
    }

    fn lossy(ptr: *const libc::c_char) -> String {
        if ptr.is_null() {
            return String::new();
        }
        // SAFETY: non-null pointers from getgrgid_r point at NUL-terminated strings inside the caller's buffer.
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }
}

#[cfg(not(unix))]
mod sys {
    use super::{Group, GroupLookupError};

    pub(super) fn getgid() -> Option<u32> {
        None
    }

    pub(super) fn getgrgid(_gid: u32) -> Result<Option<Group>, GroupLookupError> {
        Ok(None)
    }
}
