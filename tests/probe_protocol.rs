//! Protocol and statistics tests for `TimingProbe` with a scripted clock.
//!
//! Probes are constructed without priority elevation so the tests are
//! deterministic and independent of privileges and of each other.

use hiprobe::{ProbeError, ScriptedClock, TimingProbe};

fn probe(times: &[f64]) -> TimingProbe<ScriptedClock> {
    TimingProbe::without_elevation("region", ScriptedClock::new(times.iter().copied()))
}

#[test]
fn matched_cycles_accumulate_total_and_mean() {
    // Three cycles with fixed deltas 2.0, 3.0, 5.0.
    let mut p = probe(&[0.0, 2.0, 10.0, 13.0, 20.0, 25.0]);
    for _ in 0..3 {
        p.start().unwrap();
        p.stop();
    }
    assert_eq!(p.number_of_starts(), 3);
    assert_eq!(p.number_of_stops(), 3);
    assert_eq!(p.total(), 10.0);
    assert_eq!(p.elapsed_samples(), &[2.0, 3.0, 5.0]);

    p.evaluate().unwrap();
    assert!((p.mean() - 10.0 / 3.0).abs() < 1e-12);
}

#[test]
fn single_sample_has_zero_standard_deviation() {
    let mut p = probe(&[0.5, 1.75]);
    p.start().unwrap();
    p.stop();
    p.evaluate().unwrap();
    assert_eq!(p.mean(), 1.25);
    assert_eq!(p.standard_deviation(), 0.0);
}

#[test]
fn reference_scenario_0_10_10_25() {
    let mut p = probe(&[0.0, 10.0, 10.0, 25.0]);
    p.start().unwrap();
    p.stop();
    p.start().unwrap();
    p.stop();

    assert_eq!(p.total(), 25.0);
    assert_eq!(p.number_of_stops(), 2);

    p.evaluate().unwrap();
    assert_eq!(p.mean(), 12.5);
    assert!((p.standard_deviation() - 7.5).abs() < 1e-12);
}

#[test]
fn stop_while_idle_is_a_no_op() {
    let mut p = probe(&[0.0, 4.0]);
    p.stop();
    p.stop();
    assert_eq!(p.number_of_stops(), 0);
    assert_eq!(p.total(), 0.0);
    assert_eq!(p.min(), 0.0);
    assert_eq!(p.max(), 0.0);

    // A real cycle afterwards behaves as if the misuse never happened.
    p.start().unwrap();
    p.stop();
    assert_eq!(p.number_of_stops(), 1);
    assert_eq!(p.total(), 4.0);
}

#[test]
fn evaluate_without_samples_fails_and_preserves_statistics() {
    let mut p = probe(&[0.0, 3.0, 3.0, 9.0]);
    assert_eq!(p.evaluate(), Err(ProbeError::InsufficientSamples));
    assert_eq!(p.mean(), 0.0);
    assert_eq!(p.standard_deviation(), 0.0);

    // Statistics from a successful evaluate survive a later failed one.
    p.start().unwrap();
    p.stop();
    p.evaluate().unwrap();
    let mean = p.mean();
    p.reset();
    assert_eq!(p.evaluate(), Err(ProbeError::InsufficientSamples));
    assert_ne!(mean, 0.0);
}

#[test]
fn reset_then_one_cycle_matches_fresh_probe() {
    // Fresh probe measuring a single 5.0s cycle.
    let mut fresh = probe(&[10.0, 15.0]);
    fresh.start().unwrap();
    fresh.stop();
    fresh.evaluate().unwrap();

    // Dirty probe: two cycles, reset, then the same single cycle.
    let mut dirty = probe(&[0.0, 1.0, 2.0, 4.0, 10.0, 15.0]);
    for _ in 0..2 {
        dirty.start().unwrap();
        dirty.stop();
    }
    dirty.evaluate().unwrap();
    dirty.reset();
    assert_eq!(dirty.number_of_starts(), 0);
    assert_eq!(dirty.number_of_stops(), 0);
    assert_eq!(dirty.total(), 0.0);

    dirty.start().unwrap();
    dirty.stop();
    dirty.evaluate().unwrap();

    assert_eq!(dirty.total(), fresh.total());
    assert_eq!(dirty.mean(), fresh.mean());
    assert_eq!(dirty.standard_deviation(), fresh.standard_deviation());
    assert_eq!(dirty.min(), fresh.min());
    assert_eq!(dirty.max(), fresh.max());
    assert_eq!(dirty.elapsed_samples(), fresh.elapsed_samples());
}

#[test]
fn double_start_is_rejected_without_corruption() {
    let mut p = probe(&[0.0, 7.0]);
    p.start().unwrap();
    assert_eq!(p.start(), Err(ProbeError::AlreadyRunning));

    assert_eq!(p.number_of_starts(), 2);
    assert_eq!(p.number_of_stops(), 0);
    assert!(p.elapsed_samples().is_empty());
    assert_eq!(p.total(), 0.0);

    // The original bracket is still live; stop() closes it against the
    // first start value.
    p.stop();
    assert_eq!(p.number_of_stops(), 1);
    assert_eq!(p.total(), 7.0);
}

#[test]
fn instant_value_is_a_raw_clock_read() {
    let p = probe(&[42.0, 43.5]);
    assert_eq!(p.instant_value(), 42.0);
    assert_eq!(p.instant_value(), 43.5);
}

#[test]
fn min_max_seeded_by_first_sample() {
    // Single large cycle, then a smaller one.
    let mut p = probe(&[0.0, 9.0, 9.0, 10.0]);
    p.start().unwrap();
    p.stop();
    assert_eq!(p.min(), 9.0);
    assert_eq!(p.max(), 9.0);

    p.start().unwrap();
    p.stop();
    assert_eq!(p.min(), 1.0);
    assert_eq!(p.max(), 9.0);
}

#[test]
fn target_name_is_mutable_metadata() {
    let mut p = probe(&[0.0]);
    assert_eq!(p.target_name(), "region");
    p.set_target_name("resampling_pass");
    assert_eq!(p.target_name(), "resampling_pass");
    assert_eq!(p.kind(), "Time");
    assert_eq!(p.unit(), "seconds");
}
