//! Unix priority elevation via `getpriority`/`setpriority`.
//!
//! Unix exposes a single nice scale (-20 through 19, lower is more
//! favorable); the sub-range below the ambient value is privileged. Only
//! root (or a process with `CAP_SYS_NICE` on Linux) can move to -20, so a
//! permission-denied outcome is the common case and is tolerated.

use std::io;

use crate::error::ProbeError;

/// Most aggressive nice value. `-NZERO` on Linux, -20 everywhere else that
/// matters; both are -20 in practice.
const TARGET_NICE: libc::c_int = -20;

/// `getpriority` legitimately returns -1, so errno must be cleared before
/// the call and checked after it.
fn clear_errno() {
    unsafe {
        *errno_location() = 0;
    }
}

fn errno() -> libc::c_int {
    unsafe { *errno_location() }
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "emscripten"))]
unsafe fn errno_location() -> *mut libc::c_int {
    libc::__errno_location()
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "tvos",
    target_os = "watchos",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
unsafe fn errno_location() -> *mut libc::c_int {
    libc::__error()
}

#[cfg(any(target_os = "netbsd", target_os = "openbsd"))]
unsafe fn errno_location() -> *mut libc::c_int {
    libc::__errno()
}

/// Saved process priority plus whether the elevation request actually took.
pub(super) struct Elevation {
    saved_nice: libc::c_int,
    changed: bool,
}

impl Elevation {
    pub(super) fn is_elevated(&self) -> bool {
        self.changed
    }

    /// Put the process back at the nice value captured by [`elevate`].
    pub(super) fn restore(self) -> Result<(), String> {
        if !self.changed {
            return Ok(());
        }
        clear_errno();
        // PRIO_PROCESS is cast because the `which` parameter type differs
        // between glibc and the other libcs.
        let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS as _, 0, self.saved_nice) };
        if rc == -1 {
            return Err(format!(
                "setpriority(PRIO_PROCESS, 0, {}) failed: {}",
                self.saved_nice,
                io::Error::last_os_error()
            ));
        }
        Ok(())
    }
}

/// Capture the current nice value and request the most aggressive one.
pub(super) fn elevate() -> Result<Elevation, ProbeError> {
    clear_errno();
    let saved_nice = unsafe { libc::getpriority(libc::PRIO_PROCESS as _, 0) };
    if saved_nice == -1 && errno() != 0 {
        return Err(ProbeError::PriorityQuery(format!(
            "getpriority(PRIO_PROCESS, 0) failed: {}",
            io::Error::last_os_error()
        )));
    }

    clear_errno();
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS as _, 0, TARGET_NICE) };
    if rc == -1 {
        // Only root may move into the privileged sub-range; everyone else
        // gets EACCES or EPERM, which is expected and tolerated.
        let err = errno();
        if err == libc::EACCES || err == libc::EPERM {
            return Ok(Elevation {
                saved_nice,
                changed: false,
            });
        }
        return Err(ProbeError::PriorityElevation(format!(
            "setpriority(PRIO_PROCESS, 0, {}) failed: {}",
            TARGET_NICE,
            io::Error::last_os_error()
        )));
    }

    Ok(Elevation {
        saved_nice,
        changed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevate_tolerates_missing_privileges() {
        let elevation = elevate().expect("EACCES/EPERM must not be fatal");
        // Whether we are root or not, restore must succeed: either it puts
        // the nice value back or it is a no-op.
        elevation.restore().expect("restore should succeed");
    }

    #[test]
    fn saved_value_matches_current_nice() {
        clear_errno();
        let current = unsafe { libc::getpriority(libc::PRIO_PROCESS as _, 0) };
        let elevation = elevate().unwrap();
        assert_eq!(elevation.saved_nice, current);
        elevation.restore().unwrap();
    }
}
