//! Windows priority elevation via priority class and thread priority.
//!
//! Windows splits scheduling priority into a coarse per-process *class* and
//! a thread priority within that class; both are raised and both are
//! restored. `REALTIME_PRIORITY_CLASS` is deliberately not requested: it can
//! starve input handling and break socket connections on the host.
//! `HIGH_PRIORITY_CLASS` is requested instead; administrators may be granted
//! more, other users are capped by the OS without an error.

use windows::Win32::System::Threading::{
    GetCurrentProcess, GetCurrentThread, GetPriorityClass, GetThreadPriority, SetPriorityClass,
    SetThreadPriority, HIGH_PRIORITY_CLASS, PROCESS_CREATION_FLAGS, THREAD_PRIORITY,
    THREAD_PRIORITY_TIME_CRITICAL,
};

use crate::error::ProbeError;

/// Sentinel returned by `GetThreadPriority` on failure.
const THREAD_PRIORITY_ERROR_RETURN: i32 = 0x7fff_ffff;

/// Saved process class and thread priority to restore on drop.
pub(super) struct Elevation {
    saved_class: PROCESS_CREATION_FLAGS,
    saved_thread: THREAD_PRIORITY,
}

impl Elevation {
    pub(super) fn is_elevated(&self) -> bool {
        // Elevation on Windows either fully succeeds or construction fails;
        // the OS caps over-privileged requests silently.
        true
    }

    /// Restore the class and thread priority captured by [`elevate`].
    ///
    /// Both restores are attempted even if the first fails.
    pub(super) fn restore(self) -> Result<(), String> {
        let mut failures = Vec::new();

        unsafe {
            if let Err(e) = SetPriorityClass(GetCurrentProcess(), self.saved_class) {
                failures.push(format!("SetPriorityClass: {}", e));
            }
            if let Err(e) = SetThreadPriority(GetCurrentThread(), self.saved_thread) {
                failures.push(format!("SetThreadPriority: {}", e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures.join("; "))
        }
    }
}

/// Capture and raise both the process priority class and the thread
/// priority. Each of the four OS calls can fail independently; query
/// failures and set failures map to distinct error variants.
pub(super) fn elevate() -> Result<Elevation, ProbeError> {
    unsafe {
        let class = GetPriorityClass(GetCurrentProcess());
        if class == 0 {
            return Err(ProbeError::PriorityQuery(format!(
                "GetPriorityClass: {}",
                windows::core::Error::from_win32()
            )));
        }
        let saved_class = PROCESS_CREATION_FLAGS(class);

        SetPriorityClass(GetCurrentProcess(), HIGH_PRIORITY_CLASS).map_err(|e| {
            ProbeError::PriorityElevation(format!("SetPriorityClass: {}", e))
        })?;

        let thread = GetThreadPriority(GetCurrentThread());
        if thread == THREAD_PRIORITY_ERROR_RETURN {
            // Roll the class back before failing; half-raised state must not
            // leak out of a failed construction.
            let _ = SetPriorityClass(GetCurrentProcess(), saved_class);
            return Err(ProbeError::PriorityQuery(format!(
                "GetThreadPriority: {}",
                windows::core::Error::from_win32()
            )));
        }
        let saved_thread = THREAD_PRIORITY(thread);

        if let Err(e) = SetThreadPriority(GetCurrentThread(), THREAD_PRIORITY_TIME_CRITICAL) {
            let _ = SetPriorityClass(GetCurrentProcess(), saved_class);
            return Err(ProbeError::PriorityElevation(format!(
                "SetThreadPriority: {}",
                e
            )));
        }

        Ok(Elevation {
            saved_class,
            saved_thread,
        })
    }
}
