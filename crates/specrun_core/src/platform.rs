//! Platform identifiers and the predicates platform guards evaluate.
//!
//! ## Notes
//! - An identifier is shaped like `<arch>-<os>` (e.g. `x86_64-linux`), mirroring the platform strings dynamic
//!   language runtimes expose.
//! - Predicates match by equality or substring, so `is("windows")` holds for `x86_64-windows` and
//!   `is("x86_64")` holds for every x86_64 family.
//! - A `Platform` is resolved once per run and passed explicitly to whoever needs it; nothing here reads the
//!   environment after construction.

use core::fmt;

/// Well-known OS family names that guards commonly test for.
pub const FAMILIES: &[&str] = &["windows", "linux", "darwin", "freebsd", "openbsd", "netbsd"];

/// Represent the platform a run executes under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    id: String,
}

impl Platform {
    /// Inject an explicit identifier (CLI override, tests).
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Derive the identifier of the compile-time target.
    ///
    /// ## Examples
    /// ```rust
    /// use specrun_core::Platform;
    ///
    /// let p = Platform::detect();
    /// assert!(p.id().contains('-'));
    /// ```
    pub fn detect() -> Self {
        let os = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };
        Self::new(format!("{}-{}", std::env::consts::ARCH, os))
    }

    /// Return the full identifier string.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Return true if `name` equals the identifier or occurs within it.
    pub fn is(&self, name: &str) -> bool {
        !name.is_empty() && (self.id == name || self.id.contains(name))
    }

    /// Negation of [`Platform::is`].
    pub fn is_not(&self, name: &str) -> bool {
        !self.is(name)
    }

    /// Return true for the Windows family.
    pub fn is_windows(&self) -> bool {
        self.is("windows")
    }

    /// Return the first well-known family this platform belongs to, if any.
    pub fn family(&self) -> Option<&'static str> {
        FAMILIES.iter().copied().find(|f| self.is(f))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
