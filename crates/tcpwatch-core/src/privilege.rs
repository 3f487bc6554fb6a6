//! Privilege awareness for socket-owner resolution.
//!
//! `/proc/<pid>/fd` is only readable for processes owned by the current
//! user unless running as root. Nothing here changes privileges; it only
//! reports what the walk will be able to see.

/// How much of the process table the owner walk can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerVisibility {
    /// Running as root: every process's descriptors are readable.
    AllProcesses,
    /// Only processes of the current user resolve to owners.
    CurrentUserOnly,
}

/// Determines the owner visibility of the current process.
#[cfg(target_os = "linux")]
#[must_use]
pub fn owner_visibility() -> OwnerVisibility {
    if nix::unistd::geteuid().is_root() {
        OwnerVisibility::AllProcesses
    } else {
        OwnerVisibility::CurrentUserOnly
    }
}

/// Stub for non-Linux platforms.
#[cfg(not(target_os = "linux"))]
#[must_use]
pub const fn owner_visibility() -> OwnerVisibility {
    OwnerVisibility::CurrentUserOnly
}

/// Logs a warning when owners of other users' sockets will show as unresolved.
pub fn warn_if_unprivileged() -> OwnerVisibility {
    let visibility = owner_visibility();
    if visibility == OwnerVisibility::CurrentUserOnly {
        tracing::warn!("not running as root; sockets of other users will show no owner");
    }
    visibility
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_reports_the_detected_visibility() {
        assert_eq!(warn_if_unprivileged(), owner_visibility());
    }
}
