//! Platform guards.

use core::fmt;

use specrun_core::Platform;

use super::scenario::ScenarioGroup;

/// Condition under which a group runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformGuard {
    /// Run only on platforms matching the name.
    Is(String),
    /// Run everywhere except platforms matching the name.
    IsNot(String),
}

impl PlatformGuard {
    pub fn is(name: impl Into<String>) -> Self {
        PlatformGuard::Is(name.into())
    }

    pub fn is_not(name: impl Into<String>) -> Self {
        PlatformGuard::IsNot(name.into())
    }

    /// Return true if a group under this guard runs on `platform`.
    pub fn allows(&self, platform: &Platform) -> bool {
        match self {
            PlatformGuard::Is(name) => platform.is(name),
            PlatformGuard::IsNot(name) => platform.is_not(name),
        }
    }

    /// Reason recorded on scenarios the guard skips.
    pub fn skip_reason(&self, platform: &Platform) -> String {
        format!("{self} (running on {platform})")
    }
}

impl fmt::Display for PlatformGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformGuard::Is(name) => write!(f, "platform_is {name}"),
            PlatformGuard::IsNot(name) => write!(f, "platform_is_not {name}"),
        }
    }
}

/// Put `group` under `guard`.
pub fn guard(guard: PlatformGuard, group: ScenarioGroup) -> ScenarioGroup {
    group.guarded(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_are_complementary() {
        let windows = Platform::new("x86_64-windows");
        let linux = Platform::new("x86_64-linux");
        assert!(PlatformGuard::is("windows").allows(&windows));
        assert!(!PlatformGuard::is("windows").allows(&linux));
        assert!(PlatformGuard::is_not("windows").allows(&linux));
        assert!(!PlatformGuard::is_not("windows").allows(&windows));
    }

    #[test]
    fn skip_reason_names_guard_and_platform() {
        let reason = PlatformGuard::is("windows").skip_reason(&Platform::new("aarch64-darwin"));
        assert_eq!(reason, "platform_is windows (running on aarch64-darwin)");
    }

    #[test]
    fn guard_fn_attaches_to_group() {
        let group = guard(PlatformGuard::is_not("windows"), ScenarioGroup::new("Etc.getgrgid"));
        assert_eq!(group.guard(), Some(&PlatformGuard::is_not("windows")));
    }
}
