//! Error types for probe construction and the measurement protocol.

/// Error returned by probe construction, the start/stop protocol, and
/// statistics evaluation.
///
/// Priority failures at construction are fatal: a measurement taken without a
/// confirmed priority context would be meaningless. The one deliberate
/// exception is insufficient privilege, which is expected on most systems and
/// degrades to measuring at ambient priority instead of erroring. Restore
/// failures at teardown are never surfaced as a variant; they are logged and
/// discarded so a failing restore cannot mask collected results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The current scheduling priority could not be read.
    ///
    /// Without the saved value there is nothing to restore at teardown, so
    /// construction of the owning probe is aborted.
    PriorityQuery(String),

    /// Scheduling priority could not be raised, for a reason other than
    /// insufficient privilege.
    ///
    /// Permission-denied outcomes (`EACCES`/`EPERM` on Unix) are not errors;
    /// they leave the probe measuring at ambient priority.
    PriorityElevation(String),

    /// `start()` was called while a previous `start()` had no matching
    /// `stop()`.
    ///
    /// The start counter still counts the attempt; the outstanding start
    /// value and all accumulators are left untouched.
    AlreadyRunning,

    /// `evaluate()` was called before any completed start/stop cycle.
    ///
    /// Collect at least one sample and retry. Previously evaluated
    /// statistics are left unchanged.
    InsufficientSamples,

    /// A collector operation named a probe that was never started.
    UnknownProbe(String),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::PriorityQuery(msg) => {
                write!(f, "current scheduling priority could not be read: {}", msg)
            }
            ProbeError::PriorityElevation(msg) => {
                write!(f, "scheduling priority could not be raised: {}", msg)
            }
            ProbeError::AlreadyRunning => {
                write!(f, "start() called while a measurement is already running")
            }
            ProbeError::InsufficientSamples => {
                write!(f, "evaluate() requires at least one completed start/stop cycle")
            }
            ProbeError::UnknownProbe(name) => {
                write!(f, "no probe named '{}' in this collector", name)
            }
        }
    }
}

impl std::error::Error for ProbeError {}
