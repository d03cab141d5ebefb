//! Registry of named probes for measuring several regions in one run.

use std::collections::BTreeMap;
use std::io;

use crate::clock::MonotonicClock;
use crate::error::ProbeError;
use crate::output;
use crate::priority::PriorityGuard;
use crate::probe::TimingProbe;

/// Thin registry of [`TimingProbe`]s keyed by target name.
///
/// The collector holds one [`PriorityGuard`] for its whole lifetime; the
/// probes it creates leave priority alone, so many named regions can be
/// measured under a single elevation instead of fighting over the
/// process-wide guard slot.
///
/// Probes are ordered by name in reports.
pub struct ProbeCollector {
    probes: BTreeMap<String, TimingProbe<MonotonicClock>>,
    _guard: PriorityGuard,
}

impl ProbeCollector {
    /// Create an empty collector, elevating priority.
    ///
    /// # Errors
    ///
    /// Same failure semantics as [`TimingProbe::new`]: fatal priority
    /// failures abort construction, insufficient privilege is tolerated.
    pub fn new() -> Result<Self, ProbeError> {
        Ok(Self {
            probes: BTreeMap::new(),
            _guard: PriorityGuard::acquire()?,
        })
    }

    /// Start (creating on first use) the probe named `name`.
    ///
    /// # Errors
    ///
    /// [`ProbeError::AlreadyRunning`] if that probe is mid-measurement.
    pub fn start(&mut self, name: &str) -> Result<(), ProbeError> {
        self.probes
            .entry(name.to_string())
            .or_insert_with(|| TimingProbe::without_elevation(name, MonotonicClock::new()))
            .start()
    }

    /// Stop the probe named `name`, recording one sample.
    ///
    /// # Errors
    ///
    /// [`ProbeError::UnknownProbe`] if no probe of that name was ever
    /// started. Stopping an idle probe is a no-op, as for
    /// [`TimingProbe::stop`].
    pub fn stop(&mut self, name: &str) -> Result<(), ProbeError> {
        match self.probes.get_mut(name) {
            Some(probe) => {
                probe.stop();
                Ok(())
            }
            None => Err(ProbeError::UnknownProbe(name.to_string())),
        }
    }

    /// Look up a probe by name.
    pub fn get(&self, name: &str) -> Option<&TimingProbe<MonotonicClock>> {
        self.probes.get(name)
    }

    /// Number of registered probes.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Whether no probe has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Evaluate every registered probe.
    ///
    /// # Errors
    ///
    /// [`ProbeError::InsufficientSamples`] if any probe has no completed
    /// cycle; probes evaluated before the failing one keep their statistics.
    pub fn evaluate_all(&mut self) -> Result<(), ProbeError> {
        for probe in self.probes.values_mut() {
            probe.evaluate()?;
        }
        Ok(())
    }

    /// Drop all registered probes and their samples.
    ///
    /// Priority elevation is unaffected; it lives as long as the collector.
    pub fn clear(&mut self) {
        self.probes.clear();
    }

    /// Write a fixed-width report of every evaluated probe, one row each.
    ///
    /// Probes with no completed cycle are skipped; the numbers written are
    /// whatever the last [`evaluate_all`](Self::evaluate_all) produced.
    pub fn write_report<W: io::Write>(&self, w: &mut W, with_header: bool) -> io::Result<()> {
        if with_header {
            writeln!(w, "{}", output::report_header())?;
        }
        for probe in self.probes.values() {
            if probe.number_of_stops() == 0 {
                continue;
            }
            writeln!(w, "{}", output::report_row(&probe.summary()))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProbeCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeCollector")
            .field("probes", &self.probes.keys().collect::<Vec<_>>())
            .finish()
    }
}
