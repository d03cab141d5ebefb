//! Timing probe: bracket a code region and accumulate elapsed-time samples.

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, MonotonicClock};
use crate::error::ProbeError;
use crate::priority::PriorityGuard;

/// What a timing probe measures.
const PROBE_KIND: &str = "Time";

/// Unit of every value the probe reports.
const PROBE_UNIT: &str = "seconds";

/// Snapshot of a probe's counters and statistics.
///
/// This is the boundary surface handed to external report writers; the probe
/// itself owns no file format. Mean and standard deviation reflect the last
/// [`TimingProbe::evaluate`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSummary {
    /// Label of the measured target.
    pub target_name: String,
    /// Number of `start()` calls, including rejected double-starts.
    pub starts: u64,
    /// Number of completed start/stop cycles.
    pub stops: u64,
    /// Sum of all elapsed samples, in seconds.
    pub total: f64,
    /// Smallest elapsed sample, in seconds.
    pub min: f64,
    /// Largest elapsed sample, in seconds.
    pub max: f64,
    /// Mean elapsed time from the last `evaluate()`.
    pub mean: f64,
    /// Population standard deviation from the last `evaluate()`.
    pub standard_deviation: f64,
}

/// Measures wall-clock time passed between two points in code.
///
/// A probe can be started and stopped repeatedly to evaluate a region over
/// multiple passes; [`evaluate`](Self::evaluate) then computes mean and
/// population standard deviation over the collected samples.
///
/// Construction elevates scheduling priority via an owned [`PriorityGuard`];
/// dropping the probe restores it. A probe is single-threaded: it is owned
/// and mutated by one thread, and provides no internal locking.
///
/// Timestamps come from the injected [`Clock`], seconds as `f64`.
pub struct TimingProbe<C: Clock = MonotonicClock> {
    target_name: String,
    clock: C,
    // Held for restore-on-drop only.
    _guard: Option<PriorityGuard>,

    start_value: f64,
    running: bool,

    samples: Vec<f64>,
    total: f64,
    min: f64,
    max: f64,
    number_of_starts: u64,
    number_of_stops: u64,

    // Lazily computed by evaluate(); stale before the first call.
    mean: f64,
    standard_deviation: f64,
}

impl TimingProbe<MonotonicClock> {
    /// Create a probe with the default monotonic clock, elevating priority.
    ///
    /// # Errors
    ///
    /// Fails with [`ProbeError::PriorityQuery`] or
    /// [`ProbeError::PriorityElevation`] when the priority context cannot be
    /// established; insufficient privilege is tolerated and measurement
    /// proceeds at ambient priority.
    pub fn new(target_name: impl Into<String>) -> Result<Self, ProbeError> {
        Self::with_clock(target_name, MonotonicClock::new())
    }
}

impl<C: Clock> TimingProbe<C> {
    /// Create a probe with an injected clock, elevating priority.
    ///
    /// Same failure semantics as [`TimingProbe::new`].
    pub fn with_clock(target_name: impl Into<String>, clock: C) -> Result<Self, ProbeError> {
        let guard = PriorityGuard::acquire()?;
        Ok(Self::build(target_name.into(), clock, Some(guard)))
    }

    /// Create a probe that leaves scheduling priority alone.
    ///
    /// For callers that manage priority themselves (e.g. a
    /// [`ProbeCollector`](crate::ProbeCollector) holding one guard for many
    /// probes) and for deterministic tests.
    pub fn without_elevation(target_name: impl Into<String>, clock: C) -> Self {
        Self::build(target_name.into(), clock, None)
    }

    fn build(target_name: String, clock: C, guard: Option<PriorityGuard>) -> Self {
        Self {
            target_name,
            clock,
            _guard: guard,
            start_value: 0.0,
            running: false,
            samples: Vec::new(),
            total: 0.0,
            min: 0.0,
            max: 0.0,
            number_of_starts: 0,
            number_of_stops: 0,
            mean: 0.0,
            standard_deviation: 0.0,
        }
    }

    /// Start measuring the region under test.
    ///
    /// # Errors
    ///
    /// [`ProbeError::AlreadyRunning`] if a previous `start()` has no matching
    /// `stop()`. The start counter still counts the attempt, but the
    /// outstanding start value and every accumulator are left untouched, so
    /// protocol misuse can never corrupt statistics.
    pub fn start(&mut self) -> Result<(), ProbeError> {
        self.number_of_starts += 1;
        if self.running {
            tracing::warn!(
                target_name = %self.target_name,
                "start() called while a measurement is already running"
            );
            return Err(ProbeError::AlreadyRunning);
        }
        self.running = true;
        self.start_value = self.clock.now();
        Ok(())
    }

    /// Stop measuring and record one elapsed sample.
    ///
    /// If no matching `start()` was called before, this is a no-op with no
    /// observable side effect.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        let elapsed = self.clock.now() - self.start_value;
        if self.number_of_stops == 0 {
            // First sample seeds both extrema.
            self.min = elapsed;
            self.max = elapsed;
        } else {
            self.min = self.min.min(elapsed);
            self.max = self.max.max(elapsed);
        }
        self.total += elapsed;
        self.samples.push(elapsed);
        self.number_of_stops += 1;
        self.running = false;
    }

    /// Compute mean and population standard deviation over all completed
    /// cycles.
    ///
    /// The mean is `total / stops`. The standard deviation is the population
    /// standard deviation (divisor N, not the Bessel-corrected N-1) of the
    /// accumulated-total checkpoints recorded at each stop.
    ///
    /// # Errors
    ///
    /// [`ProbeError::InsufficientSamples`] if no cycle completed yet; the
    /// previously evaluated statistics are left unchanged.
    pub fn evaluate(&mut self) -> Result<(), ProbeError> {
        if self.number_of_stops == 0 {
            return Err(ProbeError::InsufficientSamples);
        }
        let n = self.number_of_stops as f64;
        self.mean = self.total / n;

        // Deviation is taken over the accumulated totals recorded at each
        // stop, not the per-cycle durations.
        let mut checkpoints = Vec::with_capacity(self.samples.len());
        let mut running = 0.0;
        for sample in &self.samples {
            running += sample;
            checkpoints.push(running);
        }
        let checkpoint_mean = checkpoints.iter().sum::<f64>() / n;
        let sum_sq: f64 = checkpoints
            .iter()
            .map(|c| (c - checkpoint_mean) * (c - checkpoint_mean))
            .sum();
        self.standard_deviation = (sum_sq / n).sqrt();
        Ok(())
    }

    /// Current clock reading.
    ///
    /// Warning: this is NOT the elapsed time since the last `start()` call;
    /// it is a raw reading of the underlying clock.
    pub fn instant_value(&self) -> f64 {
        self.clock.now()
    }

    /// Clear counters, accumulators, samples, and evaluated statistics.
    ///
    /// The owned priority guard is unaffected; elevation persists across
    /// resets within one probe instance.
    pub fn reset(&mut self) {
        self.start_value = 0.0;
        self.running = false;
        self.samples.clear();
        self.total = 0.0;
        self.min = 0.0;
        self.max = 0.0;
        self.number_of_starts = 0;
        self.number_of_stops = 0;
        self.mean = 0.0;
        self.standard_deviation = 0.0;
    }

    /// Label of the measured target.
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Replace the target label.
    pub fn set_target_name(&mut self, name: impl Into<String>) {
        self.target_name = name.into();
    }

    /// What this probe measures ("Time").
    pub fn kind(&self) -> &'static str {
        PROBE_KIND
    }

    /// Unit of reported values ("seconds").
    pub fn unit(&self) -> &'static str {
        PROBE_UNIT
    }

    /// Number of `start()` calls, including rejected double-starts.
    pub fn number_of_starts(&self) -> u64 {
        self.number_of_starts
    }

    /// Number of completed start/stop cycles.
    pub fn number_of_stops(&self) -> u64 {
        self.number_of_stops
    }

    /// Sum of all elapsed samples, in seconds.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Smallest elapsed sample; meaningful once a cycle completed.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest elapsed sample; meaningful once a cycle completed.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Mean from the last [`evaluate`](Self::evaluate) call.
    ///
    /// Stale (zero) before the first successful `evaluate()`; sequencing is
    /// the caller's responsibility.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation from the last
    /// [`evaluate`](Self::evaluate) call.
    ///
    /// Same staleness caveat as [`mean`](Self::mean).
    pub fn standard_deviation(&self) -> f64 {
        self.standard_deviation
    }

    /// Per-cycle elapsed samples in insertion order.
    pub fn elapsed_samples(&self) -> &[f64] {
        &self.samples
    }

    /// Whether the OS actually granted elevated priority for this probe.
    pub fn is_elevated(&self) -> bool {
        self._guard.as_ref().is_some_and(PriorityGuard::is_elevated)
    }

    /// Snapshot of counters and statistics for external report writers.
    pub fn summary(&self) -> ProbeSummary {
        ProbeSummary {
            target_name: self.target_name.clone(),
            starts: self.number_of_starts,
            stops: self.number_of_stops,
            total: self.total,
            min: self.min,
            max: self.max,
            mean: self.mean,
            standard_deviation: self.standard_deviation,
        }
    }
}

impl<C: Clock> std::fmt::Debug for TimingProbe<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimingProbe")
            .field("target_name", &self.target_name)
            .field("running", &self.running)
            .field("starts", &self.number_of_starts)
            .field("stops", &self.number_of_stops)
            .field("total", &self.total)
            .finish()
    }
}
