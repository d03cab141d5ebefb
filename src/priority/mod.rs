//! Scheduling-priority elevation for reduced preemption during measurement.
//!
//! Elevating priority reduces timing noise from preemption by other
//! processes. Elevation is best-effort: insufficient privilege is an expected
//! outcome and degrades gracefully to measuring at ambient priority.
//!
//! # Platform Behavior
//!
//! - **Unix**: one numeric nice scale with a privileged sub-range. The guard
//!   requests nice -20 for the current process; `EACCES`/`EPERM` are
//!   tolerated (un-elevated guard), any other failure is fatal.
//! - **Windows**: a coarse priority *class* per process plus a thread
//!   priority within the class. The guard raises the class to
//!   `HIGH_PRIORITY_CLASS` (administrators may be promoted further, other
//!   users are capped silently by the OS) and the thread to
//!   `THREAD_PRIORITY_TIME_CRITICAL`. Each step can fail independently and
//!   any failure is fatal, since Windows caps silently instead of returning
//!   a permission error.
//!
//! # Single-Guard Contract
//!
//! Priority is process-wide mutable state, so two live guards would race on
//! save/restore and leave the process at an unspecified final priority. The
//! module holds a process-wide slot: the first live guard owns elevation,
//! any guard acquired while it is alive is inert (touches nothing, restores
//! nothing) and the degradation is logged once per occurrence.
//!
//! # Example
//!
//! ```no_run
//! use hiprobe::priority::PriorityGuard;
//!
//! let guard = PriorityGuard::acquire()?;
//! if !guard.is_elevated() {
//!     eprintln!("measuring at ambient priority");
//! }
//! // ... measurements ...
//! drop(guard); // original priority restored
//! # Ok::<(), hiprobe::ProbeError>(())
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ProbeError;

#[cfg(unix)]
#[path = "unix.rs"]
mod platform;

#[cfg(windows)]
#[path = "windows.rs"]
mod platform;

// Platforms with no known priority API: every guard is un-elevated and
// restore is a no-op.
#[cfg(not(any(unix, windows)))]
mod platform {
    use crate::error::ProbeError;

    pub(super) struct Elevation;

    impl Elevation {
        pub(super) fn is_elevated(&self) -> bool {
            false
        }

        pub(super) fn restore(self) -> Result<(), String> {
            Ok(())
        }
    }

    pub(super) fn elevate() -> Result<Elevation, ProbeError> {
        Ok(Elevation)
    }
}

/// Whether a guard currently owns the process-wide elevation slot.
static SLOT_HELD: AtomicBool = AtomicBool::new(false);

/// RAII guard that restores the original scheduling priority when dropped.
///
/// Acquired once per probe; never cloned or shared. Restore failures at drop
/// are logged via `tracing::warn!` and discarded, never panicked on, so a
/// failing restore cannot abort teardown of the owning probe.
pub struct PriorityGuard {
    elevation: Option<platform::Elevation>,
    owns_slot: bool,
}

impl PriorityGuard {
    /// Capture the current priority and raise it as far as the current
    /// privilege level allows.
    ///
    /// # Errors
    ///
    /// - [`ProbeError::PriorityQuery`] if the current priority cannot be
    ///   read (nothing to restore later).
    /// - [`ProbeError::PriorityElevation`] if raising fails for any reason
    ///   other than insufficient privilege. Permission-denied outcomes are
    ///   tolerated and yield an un-elevated guard.
    ///
    /// If another guard is alive in this process, the returned guard is
    /// inert: it neither changes nor restores priority.
    pub fn acquire() -> Result<Self, ProbeError> {
        if SLOT_HELD.swap(true, Ordering::AcqRel) {
            tracing::warn!(
                "another PriorityGuard is already active in this process; \
                 acquiring an inert guard"
            );
            return Ok(Self {
                elevation: None,
                owns_slot: false,
            });
        }

        match platform::elevate() {
            Ok(elevation) => {
                if elevation.is_elevated() {
                    tracing::debug!("scheduling priority elevated");
                } else {
                    tracing::debug!(
                        "priority elevation not permitted; measuring at ambient priority"
                    );
                }
                Ok(Self {
                    elevation: Some(elevation),
                    owns_slot: true,
                })
            }
            Err(e) => {
                SLOT_HELD.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    /// Whether the OS actually granted elevated priority.
    ///
    /// `false` for inert guards and for guards constructed under
    /// insufficient privilege.
    pub fn is_elevated(&self) -> bool {
        self.elevation
            .as_ref()
            .is_some_and(platform::Elevation::is_elevated)
    }
}

impl Drop for PriorityGuard {
    fn drop(&mut self) {
        if let Some(elevation) = self.elevation.take() {
            match elevation.restore() {
                Ok(()) => tracing::debug!("original scheduling priority restored"),
                Err(msg) => tracing::warn!("failed to restore scheduling priority: {}", msg),
            }
        }
        if self.owns_slot {
            SLOT_HELD.store(false, Ordering::Release);
        }
    }
}

impl std::fmt::Debug for PriorityGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityGuard")
            .field("elevated", &self.is_elevated())
            .field("owns_slot", &self.owns_slot)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Guard tests share the process-wide slot, so they run under one test to
    // avoid cross-test interference from parallel execution.
    #[test]
    fn acquire_restore_and_nesting() {
        // Acquisition must succeed whether or not we have privileges.
        let guard = PriorityGuard::acquire().expect("acquire must tolerate missing privileges");

        // A second live guard is inert, never elevated, and its drop is a
        // no-op.
        let nested = PriorityGuard::acquire().expect("nested acquire must not fail");
        assert!(!nested.is_elevated());
        drop(nested);

        // The outer guard still owns the slot after the inert guard dropped.
        let nested_again = PriorityGuard::acquire().unwrap();
        assert!(!nested_again.is_elevated());
        drop(nested_again);

        drop(guard);

        // Slot released: acquiring again must still succeed. Other tests in
        // this binary may hold the slot concurrently, so ownership is not
        // asserted here.
        let fresh = PriorityGuard::acquire().unwrap();
        drop(fresh);
    }
}
