//! Human-readable formatting of probe results.
//!
//! The probe owns no file format; these helpers render counters and
//! statistics for terminals and plain-text reports. Structured serialization
//! goes through [`ProbeSummary`](crate::ProbeSummary) and external writers.

use colored::Colorize;

use crate::clock::Clock;
use crate::probe::{ProbeSummary, TimingProbe};

/// Column layout shared by [`report_header`] and [`report_row`].
const NAME_WIDTH: usize = 24;
const COUNT_WIDTH: usize = 8;
const VALUE_WIDTH: usize = 14;

/// Header line for a fixed-width probe report.
pub fn report_header() -> String {
    format!(
        "{:<nw$}{:>cw$}{:>cw$}{:>vw$}{:>vw$}{:>vw$}{:>vw$}{:>vw$}",
        "Name",
        "Starts",
        "Stops",
        "Total(s)",
        "Min(s)",
        "Mean(s)",
        "Max(s)",
        "StdDev(s)",
        nw = NAME_WIDTH,
        cw = COUNT_WIDTH,
        vw = VALUE_WIDTH,
    )
}

/// One fixed-width report row for an evaluated probe.
pub fn report_row(summary: &ProbeSummary) -> String {
    format!(
        "{:<nw$}{:>cw$}{:>cw$}{:>vw$.6}{:>vw$.6}{:>vw$.6}{:>vw$.6}{:>vw$.6}",
        summary.target_name,
        summary.starts,
        summary.stops,
        summary.total,
        summary.min,
        summary.mean,
        summary.max,
        summary.standard_deviation,
        nw = NAME_WIDTH,
        cw = COUNT_WIDTH,
        vw = VALUE_WIDTH,
    )
}

/// Multi-line colored summary of a single evaluated probe.
///
/// Numbers reflect the last `evaluate()` call; evaluate first.
pub fn format_probe<C: Clock>(probe: &TimingProbe<C>) -> String {
    let s = probe.summary();
    let mut out = String::new();

    out.push_str(&format!(
        "{} [{}, {}]\n",
        s.target_name.bold(),
        probe.kind(),
        probe.unit()
    ));
    out.push_str(&format!(
        "  cycles: {}  total: {:.6}s\n",
        s.stops, s.total
    ));
    out.push_str(&format!(
        "  mean: {:.6}s  stddev: {:.6}s\n",
        s.mean, s.standard_deviation
    ));
    out.push_str(&format!("  min: {:.6}s  max: {:.6}s\n", s.min, s.max));
    if s.starts != s.stops {
        out.push_str(&format!(
            "  {}\n",
            format!("unmatched starts: {} starts / {} stops", s.starts, s.stops).yellow()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ScriptedClock;

    fn evaluated_probe() -> TimingProbe<ScriptedClock> {
        let mut probe = TimingProbe::without_elevation(
            "smoothing_filter",
            ScriptedClock::new([0.0, 0.25, 1.0, 1.75]),
        );
        for _ in 0..2 {
            probe.start().unwrap();
            probe.stop();
        }
        probe.evaluate().unwrap();
        probe
    }

    #[test]
    fn row_aligns_under_header() {
        let probe = evaluated_probe();
        let header = report_header();
        let row = report_row(&probe.summary());
        assert_eq!(header.len(), row.len());
        assert!(row.starts_with("smoothing_filter"));
        assert!(row.contains("1.000000")); // total
    }

    #[test]
    fn probe_block_reports_statistics() {
        colored::control::set_override(false);
        let text = format_probe(&evaluated_probe());
        assert!(text.contains("smoothing_filter [Time, seconds]"));
        assert!(text.contains("cycles: 2"));
        assert!(text.contains("mean: 0.500000s"));
        assert!(!text.contains("unmatched"));
    }

    #[test]
    fn probe_block_flags_unmatched_starts() {
        colored::control::set_override(false);
        let mut probe =
            TimingProbe::without_elevation("leaky", ScriptedClock::new([0.0, 1.0]));
        probe.start().unwrap();
        probe.stop();
        let _ = probe.start();
        let _ = probe.start(); // rejected, but counted
        probe.stop();
        probe.evaluate().unwrap();
        let text = format_probe(&probe);
        assert!(text.contains("unmatched starts: 3 starts / 2 stops"));
    }
}
