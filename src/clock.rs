//! Monotonic clock source for elapsed-time measurement.
//!
//! The probe does not own a timing technology; it consumes a single
//! capability, [`Clock::now`], returning seconds as `f64`. The default
//! implementation is [`MonotonicClock`], anchored to a `std::time::Instant`
//! captured at construction. Tests inject scripted clocks instead.

use std::cell::Cell;
use std::time::Instant;

/// A monotonic timestamp source.
///
/// Timestamps are seconds as `f64`, monotonically non-decreasing within one
/// clock instance. Subtracting two readings yields an elapsed duration in
/// seconds. Implementations take `&self`; scripted test clocks use interior
/// mutability.
pub trait Clock {
    /// Current timestamp in seconds.
    fn now(&self) -> f64;
}

/// Default clock backed by `std::time::Instant`.
///
/// Readings are seconds elapsed since the clock was constructed. `Instant`
/// is monotonic on every supported platform, so readings never go backwards
/// even across system clock adjustments.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    anchor: Instant,
}

impl MonotonicClock {
    /// Create a clock anchored at the current instant.
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> f64 {
        self.anchor.elapsed().as_secs_f64()
    }
}

/// Clock that replays a fixed script of timestamps.
///
/// Each `now()` call returns the next scripted value; once the script is
/// exhausted the last value repeats. Useful for deterministic protocol and
/// statistics tests of instrumented code.
#[derive(Debug)]
pub struct ScriptedClock {
    times: Vec<f64>,
    next: Cell<usize>,
}

impl ScriptedClock {
    /// Create a clock that replays `times` in order.
    ///
    /// # Panics
    ///
    /// Panics if the script is empty.
    pub fn new(times: impl IntoIterator<Item = f64>) -> Self {
        let times: Vec<f64> = times.into_iter().collect();
        assert!(!times.is_empty(), "scripted clock needs at least one timestamp");
        Self {
            times,
            next: Cell::new(0),
        }
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> f64 {
        let i = self.next.get();
        if i + 1 < self.times.len() {
            self.next.set(i + 1);
        }
        self.times[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        std::hint::black_box(vec![0u8; 4096]);
        let b = clock.now();
        assert!(b >= a, "clock went backwards: {} -> {}", a, b);
    }

    #[test]
    fn fresh_clock_starts_near_zero() {
        let clock = MonotonicClock::new();
        assert!(clock.now() < 1.0);
    }

    #[test]
    fn scripted_clock_replays_then_holds_last() {
        let clock = ScriptedClock::new([1.0, 2.0, 4.0]);
        assert_eq!(clock.now(), 1.0);
        assert_eq!(clock.now(), 2.0);
        assert_eq!(clock.now(), 4.0);
        assert_eq!(clock.now(), 4.0);
    }
}
