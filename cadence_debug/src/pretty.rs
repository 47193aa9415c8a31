// Copyright 2026 the Cadence Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable smoothness output.
//!
//! [`PrettyPrintSink`] implements
//! [`SmoothnessSink`](cadence_core::report::SmoothnessSink) and writes one
//! line per record to a [`Write`](std::io::Write) destination (default:
//! stderr).

use std::io::Write;

use cadence_core::report::{ScrollJankDiagnostic, SmoothnessReport, SmoothnessSink};

/// Writes human-readable smoothness lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn changed_marker(changed: bool) -> &'static str {
    if changed { "*" } else { "" }
}

impl<W: Write> SmoothnessSink for PrettyPrintSink<W> {
    fn on_report(&mut self, report: &SmoothnessReport) {
        let _ = writeln!(
            self.writer,
            "[report] frames={} dropped={} avg={:.1}% worst={:.1}%{} p95={}{}",
            report.total_frames,
            report.total_dropped,
            report.avg_percent_dropped,
            report.worst_percent_dropped,
            changed_marker(report.worst_changed),
            report.percentile_95,
            changed_marker(report.percentile_95_changed),
        );
    }

    fn on_ui_report(&mut self, report: &SmoothnessReport) {
        let _ = writeln!(
            self.writer,
            "[report:ui] worst={:.1}%{}",
            report.worst_percent_dropped,
            changed_marker(report.worst_changed),
        );
    }

    fn on_scroll_jank(&mut self, diagnostic: &ScrollJankDiagnostic) {
        let _ = writeln!(
            self.writer,
            "[jank] scroll+{:.1}ms frames={}",
            diagnostic.time_since_scroll_start.as_nanos() as f64 / 1_000_000.0,
            diagnostic.frames_since_scroll_start,
        );
    }
}

#[cfg(test)]
mod tests {
    use cadence_core::time::Duration;

    use super::*;

    fn sample_report() -> SmoothnessReport {
        SmoothnessReport {
            avg_percent_dropped: 2.25,
            worst_percent_dropped: 23.0,
            percentile_95: 17,
            bucket_percentages: [0.0; 7],
            worst_after_1s: Some(23.0),
            worst_after_2s: None,
            worst_after_5s: None,
            time_of_worst: Duration::from_millis(1_400),
            total_frames: 5_821,
            total_dropped: 132,
            worst_changed: true,
            percentile_95_changed: false,
        }
    }

    #[test]
    fn pretty_print_report() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_report(&sample_report());
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("[report]"), "got: {output}");
        assert!(output.contains("worst=23.0%*"), "got: {output}");
        assert!(output.contains("p95=17"), "got: {output}");
    }

    #[test]
    fn pretty_print_jank() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_scroll_jank(&ScrollJankDiagnostic {
            time_since_scroll_start: Duration::from_millis(142),
            frames_since_scroll_start: 9,
        });
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("[jank] scroll+142.0ms frames=9"), "got: {output}");
    }
}
