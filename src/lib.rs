//! # hiprobe
//!
//! High-priority timing probes for wall-clock regression benchmarking.
//!
//! Wall-clock measurements of short code regions are noisy because the OS
//! scheduler is free to preempt the measuring thread. This crate elevates the
//! calling process (and, where the platform distinguishes it, the calling
//! thread) to the highest scheduling priority the current privilege level
//! allows for the lifetime of a probe, then restores the original priority
//! when the probe is dropped.
//!
//! Elevation is best-effort: on Unix, raising priority beyond the ambient
//! level normally requires root, and a permission-denied outcome is expected
//! and tolerated rather than fatal. Measurement proceeds at ambient priority.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hiprobe::TimingProbe;
//!
//! # fn work_under_test() {}
//! let mut probe = TimingProbe::new("matrix_multiply")?;
//! for _ in 0..100 {
//!     probe.start()?;
//!     work_under_test();
//!     probe.stop();
//! }
//! probe.evaluate()?;
//! println!("mean: {:.6}s +/- {:.6}s", probe.mean(), probe.standard_deviation());
//! # Ok::<(), hiprobe::ProbeError>(())
//! ```
//!
//! ## Measuring several regions
//!
//! ```no_run
//! use hiprobe::ProbeCollector;
//!
//! let mut collector = ProbeCollector::new()?;
//! for _ in 0..100 {
//!     collector.start("parse")?;
//!     // ... region under test ...
//!     collector.stop("parse")?;
//! }
//! collector.evaluate_all()?;
//! collector.write_report(&mut std::io::stdout().lock(), true)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Protocol
//!
//! A probe is a small state machine: `Idle` before the first [`start`] and
//! after every matching [`stop`]; `Running` in between. Misuse is handled
//! permissively: `stop()` while idle is a no-op, a second `start()` while
//! running fails with [`ProbeError::AlreadyRunning`] without corrupting any
//! counter. `evaluate()` computes the mean and *population* standard
//! deviation (divisor N, not N-1) over all completed cycles.
//!
//! [`start`]: TimingProbe::start
//! [`stop`]: TimingProbe::stop

#![warn(missing_docs)]
#![warn(clippy::all)]

mod clock;
mod collector;
mod error;
mod probe;

pub mod output;
pub mod priority;

pub use clock::{Clock, MonotonicClock, ScriptedClock};
pub use collector::ProbeCollector;
pub use error::ProbeError;
pub use priority::PriorityGuard;
pub use probe::{ProbeSummary, TimingProbe};
